use lazy_pager::{PageRequest, SourceFetch};

use crate::demo_source::DemoSource;

#[derive(Debug)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Retry,
    Refresh,
    ToggleLayout,

    // Paging
    RequestPage(PageRequest<u32>),
    PageFetched(SourceFetch<DemoSource>),

    None,
}

use crate::services::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ItemStore,
    pub max_page_size: usize,
}

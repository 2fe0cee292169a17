use nw_storage::SharedStore;

pub struct AppState {
    pub store: SharedStore,
}

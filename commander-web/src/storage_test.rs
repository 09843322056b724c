//! Browser-only checks for the local storage adapter.

#[cfg(test)]
mod tests {
    use crate::api::BrowserStorage;
    use shared::storage::{KeyValueStore, THEME_KEY, TOKEN_KEY};
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn stores_plain_strings() {
        let storage = BrowserStorage;
        storage.set(TOKEN_KEY, "abc.def.ghi");
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc.def.ghi"));

        // Raw values, not JSON-encoded ones.
        let raw = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .and_then(|local| local.get_item(TOKEN_KEY).ok().flatten());
        assert_eq!(raw.as_deref(), Some("abc.def.ghi"));

        storage.remove(TOKEN_KEY);
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[wasm_bindgen_test]
    fn missing_key_reads_as_none() {
        let storage = BrowserStorage;
        storage.remove(THEME_KEY);
        assert!(storage.get(THEME_KEY).is_none());
    }
}

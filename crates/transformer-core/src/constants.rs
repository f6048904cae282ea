//! Fixed identifiers shared between the editor, the storage layer and the
//! cross-context message transport.

// Structured-data fields persisted by the extension.
pub const RULES_FIELD_KEY: &str = "__hs_rules__";
pub const ACTION_FIELD_KEY: &str = "__hs_action__";
pub const FAKED_FIELD_KEY: &str = "__hs_faked__";
pub const SELECTED_ROW_FIELD_KEYS: &str = "__hs_selectedRowKeys__";
pub const DARK_FIELD_KEY: &str = "__hs_dark__";
pub const INDEX_FIELD_KEY: &str = "__hs_index__";
pub const HIDDEN_FIELDS_FIELD_KEY: &str = "__hs_hiddenFields__";
pub const PATH_FIELD_KEY: &str = "__hs_path__";

// Message types routed between content script, background and popup.
pub const SYNC_DATA_MSG_KEY: &str = "__hs_syncdata__";
pub const UPDATE_MSG_KEY: &str = "__hs_update__";
pub const COUNT_MSG_KEY: &str = "__hs_count__";
pub const RESPONSE_MSG_KEY: &str = "__hs_response__";
pub const PAGESCRIPT_MSG_KEY: &str = "__hs_pagescript__";
pub const STORAGE_MSG_KEY: &str = "__hs_storage__";
pub const LOG_MSG_KEY: &str = "__hs_log__";
pub const BACKGROUND_MSG_KEY: &str = "__hs_background__";
pub const POPUP_MSG_KEY: &str = "__hs_popup__";

/// `from` marker of log envelopes sent by the editor surface.
pub const IFRAME_SOURCE: &str = "__hs_iframe__";
/// `key` of log envelopes.
pub const LOG_KEY: &str = "log";
/// Storage key holding the expanded panel ids.
pub const ACTIVE_KEY_STORAGE_KEY: &str = "activeKey";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    fn test_keys_are_unique() {
        let keys = [
            RULES_FIELD_KEY,
            ACTION_FIELD_KEY,
            FAKED_FIELD_KEY,
            SELECTED_ROW_FIELD_KEYS,
            DARK_FIELD_KEY,
            INDEX_FIELD_KEY,
            HIDDEN_FIELDS_FIELD_KEY,
            PATH_FIELD_KEY,
            SYNC_DATA_MSG_KEY,
            UPDATE_MSG_KEY,
            COUNT_MSG_KEY,
            RESPONSE_MSG_KEY,
            PAGESCRIPT_MSG_KEY,
            STORAGE_MSG_KEY,
            LOG_MSG_KEY,
            BACKGROUND_MSG_KEY,
            POPUP_MSG_KEY,
            IFRAME_SOURCE,
        ];
        let unique: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[rstest]
    #[case(LOG_MSG_KEY, "__hs_log__")]
    #[case(IFRAME_SOURCE, "__hs_iframe__")]
    #[case(LOG_KEY, "log")]
    #[case(ACTIVE_KEY_STORAGE_KEY, "activeKey")]
    fn test_log_routing_literals(#[case] actual: &str, #[case] expected: &str) {
        assert_eq!(actual, expected);
    }
}

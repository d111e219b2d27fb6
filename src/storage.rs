use piece_perfect_core::{BestTimeStore, GameRules};

pub(crate) const RULES_KEY: &str = "piece-perfect.rules.v1";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

/// Best times kept in `localStorage`, one millisecond count per key.
#[derive(Default)]
pub(crate) struct LocalStorageBestTimes;

impl BestTimeStore for LocalStorageBestTimes {
    fn load(&self, key: &str) -> Option<u64> {
        let raw = local_storage()?.get_item(key).ok()??;
        parse_stored_ms(&raw)
    }

    fn store(&mut self, key: &str, elapsed_ms: u64) {
        let Some(storage) = local_storage() else {
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::log!("best time: storage unavailable");
            }
            return;
        };
        if storage.set_item(key, &elapsed_ms.to_string()).is_err() {
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::log!("best time: storage set failed", key);
            }
        }
    }
}

/// Unparseable values are treated as missing so a corrupt record gets
/// replaced by the next finish.
pub(crate) fn parse_stored_ms(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    trimmed.parse::<u64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map(|value| value.round() as u64)
    })
}

/// Rules override saved under [`RULES_KEY`], or the defaults.
pub(crate) fn load_rules() -> GameRules {
    let Some(raw) = local_storage().and_then(|storage| storage.get_item(RULES_KEY).ok().flatten())
    else {
        return GameRules::default();
    };
    match GameRules::from_json(&raw) {
        Ok(rules) => {
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::log!("rules: loaded override");
            }
            rules
        }
        Err(_err) => {
            #[cfg(target_arch = "wasm32")]
            {
                gloo::console::warn!("rules: ignoring override", _err.to_string());
            }
            GameRules::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values_parse_leniently() {
        assert_eq!(parse_stored_ms("45000"), Some(45000));
        assert_eq!(parse_stored_ms(" 1200.6 "), Some(1201));
        assert_eq!(parse_stored_ms("NaN"), None);
        assert_eq!(parse_stored_ms("-5"), None);
        assert_eq!(parse_stored_ms(""), None);
    }
}

//! zigbee2mqtt topic grammar.
//!
//! Below the namespace prefix a topic is one of:
//! - `bridge...` — bridge housekeeping, never routed
//! - `<device>/availability` — availability report
//! - `<device>` — device data

/// Suffix zigbee2mqtt appends to availability topics.
pub const AVAILABILITY_SUFFIX: &str = "/availability";

/// Prefix of the reserved bridge sub-namespace.
pub const BRIDGE_PREFIX: &str = "bridge";

/// Where an inbound message should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Bridge state, logs, and other housekeeping.
    Bridge,
    /// Availability report for the named device.
    Availability(&'a str),
    /// Data report for the named device.
    Data(&'a str),
    /// Outside the namespace entirely.
    Foreign,
}

/// Classify `topic` relative to `base_topic`.
#[must_use]
pub fn classify<'a>(base_topic: &str, topic: &'a str) -> Route<'a> {
    let Some(rest) = topic
        .strip_prefix(base_topic)
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return Route::Foreign;
    };
    if rest.starts_with(BRIDGE_PREFIX) {
        return Route::Bridge;
    }
    match rest.strip_suffix(AVAILABILITY_SUFFIX) {
        Some(device) => Route::Availability(device),
        None => Route::Data(rest),
    }
}

/// Wildcard covering every topic in the namespace.
#[must_use]
pub fn wildcard(base_topic: &str) -> String {
    format!("{base_topic}/#")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_bridge_topics() {
        assert_eq!(classify("zigbee2mqtt", "zigbee2mqtt/bridge/state"), Route::Bridge);
        assert_eq!(
            classify("zigbee2mqtt", "zigbee2mqtt/bridge/devices"),
            Route::Bridge
        );
    }

    #[test]
    fn should_strip_availability_suffix() {
        assert_eq!(
            classify("zigbee2mqtt", "zigbee2mqtt/frontdoor/availability"),
            Route::Availability("frontdoor")
        );
    }

    #[test]
    fn should_treat_remaining_topic_as_device() {
        assert_eq!(
            classify("zigbee2mqtt", "zigbee2mqtt/frontdoor"),
            Route::Data("frontdoor")
        );
        assert_eq!(
            classify("zigbee2mqtt", "zigbee2mqtt/frontdoor/set"),
            Route::Data("frontdoor/set")
        );
    }

    #[test]
    fn should_keep_nested_friendly_names_whole() {
        assert_eq!(
            classify("zigbee2mqtt", "zigbee2mqtt/living_room/door"),
            Route::Data("living_room/door")
        );
        assert_eq!(
            classify("zigbee2mqtt", "zigbee2mqtt/living_room/door/availability"),
            Route::Availability("living_room/door")
        );
    }

    #[test]
    fn should_reject_topics_outside_namespace() {
        assert_eq!(classify("zigbee2mqtt", "homeassistant/frontdoor"), Route::Foreign);
        assert_eq!(classify("zigbee2mqtt", "zigbee2mqtt"), Route::Foreign);
        assert_eq!(classify("zigbee2mqtt", "zigbee2mqttx/frontdoor"), Route::Foreign);
    }

    #[test]
    fn should_honour_custom_base_topic() {
        assert_eq!(classify("z2m", "z2m/backdoor"), Route::Data("backdoor"));
        assert_eq!(wildcard("z2m"), "z2m/#");
    }
}

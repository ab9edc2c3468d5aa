use chrono::prelude::*;
use gloo::storage::{LocalStorage, Storage};
use sapper_core as game;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Types persisted in `localStorage` under a fixed key.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_else(|err| {
            log::debug!("no usable {} in local storage: {}", T::KEY, err);
            T::default()
        })
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("Could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

impl StorageKey for game::BoardSize {
    const KEY: &'static str = "sapper:board-size";
}

/// High-score store backed by the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BrowserStore;

impl game::ScoreStore for BrowserStore {
    fn read(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("could not read {} from local storage: {:?}", key, err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> game::Result<()> {
        LocalStorage::raw().set_item(key, value).map_err(|err| {
            log::error!("could not write {} to local storage: {:?}", key, err);
            game::GameError::StorageUnavailable
        })
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes(core::array::from_fn(|_| (256. * random()) as u8))
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Timestamp in the same shape as JavaScript's `Date.prototype.toISOString`.
pub(crate) fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders a stored ISO-8601 timestamp as a calendar date, or as-is if it doesn't parse.
pub(crate) fn format_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|date| date.with_timezone(&Utc).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

/// `mm:ss`, minutes keep growing past 99.
pub(crate) fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub(crate) fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_clamps_and_pads() {
        assert_eq!(format_for_counter(40), "040");
        assert_eq!(format_for_counter(-3), "-03");
        assert_eq!(format_for_counter(-150), "-99");
        assert_eq!(format_for_counter(12345), "999");
    }

    #[test]
    fn time_is_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn timestamps_round_trip_to_dates() {
        let time = DateTime::<Utc>::from_timestamp_millis(1_714_564_800_123).unwrap();
        let stamp = iso_timestamp(time);
        assert_eq!(stamp, "2024-05-01T12:00:00.123Z");
        assert_eq!(format_date(&stamp), "2024-05-01");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn board_size_storage_key() {
        assert_eq!(<game::BoardSize as StorageKey>::KEY, "sapper:board-size");
    }
}

use crate::{
    channel::message::CoordValue,
    core::config::QueryKeys,
    dom::DomHost,
    prelude::HashMap,
    sync::fields::{ApplyOutcome, FieldBinding, FieldSynchronizer},
    PickerError, Result,
};
use percent_encoding::percent_decode_str;
use url::Url;

/// Decodes one percent-encoded query component.
///
/// Strict: a `%` must be followed by two hex digits and the decoded bytes must
/// be UTF-8. `+` stays a plus sign.
pub fn decode_component(component: &str) -> Result<String> {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(PickerError::MalformedQuery(format!(
                    "bad escape at byte {} in {:?}",
                    i, component
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(component)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| PickerError::MalformedQuery(format!("{:?}: {}", component, e)))
}

/// Splits a query string (without the leading `?`) into key/value pairs.
///
/// A pair that fails to decode is skipped; the rest are kept. Later duplicates
/// win. A value is the text between the first and second `=`.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();

        match (decode_component(key), decode_component(value)) {
            (Ok(key), Ok(value)) => {
                params.insert(key, value);
            }
            (Err(e), _) | (_, Err(e)) => {
                log::debug!("skipping query pair {:?}: {}", pair, e);
            }
        }
    }

    params
}

/// Query part of a page location.
///
/// Accepts a full URL, a `?query` string or a bare query. A `#fragment` is
/// never part of the query.
pub fn query_of(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => {
            let query = location.split_once('#').map_or(location, |(query, _)| query);
            query.strip_prefix('?').unwrap_or(query).to_string()
        }
    }
}

/// Applies a coordinate supplied in the page's query string on load
#[derive(Debug, Clone)]
pub struct UrlBootstrap {
    keys: QueryKeys,
    binding: FieldBinding,
    synchronizer: FieldSynchronizer,
}

impl UrlBootstrap {
    pub fn new(keys: QueryKeys, binding: FieldBinding, synchronizer: FieldSynchronizer) -> Self {
        Self {
            keys,
            binding,
            synchronizer,
        }
    }

    /// Returns the apply outcome when both keys carried a value
    pub fn run(&self, host: &mut dyn DomHost, location: &str) -> Option<ApplyOutcome> {
        let params = parse_query(&query_of(location));

        let lat = params.get(&self.keys.lat).filter(|v| !v.is_empty());
        let lng = params.get(&self.keys.lng).filter(|v| !v.is_empty());
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (CoordValue::from(lat.as_str()), CoordValue::from(lng.as_str())),
            _ => {
                log::trace!("no coordinate in page location");
                return None;
            }
        };

        log::debug!("bootstrapping coordinate from query string");
        Some(
            self.synchronizer
                .apply_coordinate(host, &self.binding, Some(&lat), Some(&lng)),
        )
    }
}

use crate::foundation::error::ScrubResult;

/// Response envelope of the storefront API: `{ "success": bool, "data": ... }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    /// The payload, or `None` when the call failed or carried nothing.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// Decode a response body. Malformed JSON is an error; a well-formed "no data" reply is `None`.
pub fn parse_envelope<T: serde::de::DeserializeOwned>(body: &[u8]) -> ScrubResult<Option<T>> {
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.into_data())
}

/// Catalog entry as the storefront lists it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in minor currency units.
    pub price_cents: u64,
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/shop/api.rs"]
mod tests;

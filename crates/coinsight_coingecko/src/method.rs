use serde::Serialize;

/// A typed endpoint: where it lives, what it takes and what it returns.
pub trait Method {
    const PATH: &'static str;

    type Response: serde::de::DeserializeOwned;
    type Params: Serialize;
}

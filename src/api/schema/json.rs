use crate::api::{
    error::PassiveError,
    schema::{Deserialize, Schema, Serialize},
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Json {}

impl Schema for Json {}

impl<T> Serialize<Json> for T
where
    T: serde::Serialize,
{
    fn serialize(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("Should always be serializable")
    }
}

impl<T> Deserialize<Json> for T
where
    T: serde::de::DeserializeOwned,
{
    fn deserialize(buf: &[u8]) -> Result<Self, PassiveError> {
        serde_json::from_slice(buf).map_err(|_| PassiveError::DeserializationFailure)
    }
}

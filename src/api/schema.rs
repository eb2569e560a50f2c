use crate::api::error::PassiveError;

#[cfg(feature = "json")]
pub mod json;

pub trait Schema: Send + Sync + 'static {}

pub trait Deserialize<S>
where
    S: Schema,
    Self: Sized,
{
    fn deserialize(value: &[u8]) -> Result<Self, PassiveError>;
}

pub trait Serialize<S>
where
    S: Schema,
{
    fn serialize(&self) -> Vec<u8>;
}

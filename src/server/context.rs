pub type PlayerId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerContext {
    id: PlayerId,
    name: String,
}

impl PlayerContext {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct State {
    pub status: Option<String>,
}

/// Response of the `info` method
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InfoResponse {
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub data: Vec<InfoEntry>,
}

impl InfoResponse {
    pub fn is_ok(&self) -> bool {
        self.state.status.as_deref() == Some("ok")
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct InfoEntry {
    pub title: Option<String>,
}

/// One element of the `playlist` method's array
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawEpisode {
    pub name: Option<String>,
    /// Standard quality stream
    pub std: Option<String>,
    /// High definition stream
    pub hd: Option<String>,
}

/// Why a subscription stopped receiving live messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Released by its owner (unsubscribe, local close or drop)
    Unsubscribed,
    /// Live queue filled up; the hub dropped the subscription instead of blocking
    Overflow,
    /// The hub was closed or dropped
    HubShutdown,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsubscribed => "unsubscribed",
            Self::Overflow => "overflow",
            Self::HubShutdown => "hub_shutdown",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

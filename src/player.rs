use std::fmt;

use serde::{Deserialize, Serialize};


// Opaque player handle issued by the host environment. The host may invalidate a handle and
// later register the same participant under a new one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct HostPlayer(pub u64);

// Internal player id. Assigned in join order, never reused within a session.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}


#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub handle: HostPlayer,
}

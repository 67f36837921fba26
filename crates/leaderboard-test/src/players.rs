//! Canned players.

use uuid::Uuid;

/// A player identity used across tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub id: &'static str,
    pub name: &'static str,
}

pub const ALICE: Player = Player {
    id: "5f0c7a52-1f4e-4b55-9a63-0c1e2a6f8e01",
    name: "alice",
};

pub const BOB: Player = Player {
    id: "8d3e2b10-6c71-4c1a-b0f4-2f9d7e4c5a02",
    name: "bob",
};

pub const CAROL: Player = Player {
    id: "1a9b4c2d-3e5f-4a6b-8c7d-9e0f1a2b3c03",
    name: "carol",
};

pub const DAVE: Player = Player {
    id: "c4d5e6f7-a8b9-4c0d-9e1f-2a3b4c5d6e04",
    name: "dave",
};

/// A random v4 UUID, the way real clients generate player ids.
pub fn fresh_player_id() -> String {
    Uuid::new_v4().to_string()
}

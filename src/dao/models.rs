use std::fmt;

use indexmap::IndexMap;
use time::PrimitiveDateTime;

use crate::dao::table_name::GameTable;

/// Full row of a game table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Serial primary key, restarted by every import.
    pub id: i32,
    /// Canonical player name, unique per table.
    pub name: String,
    /// Optional nickname, unique per table when present.
    pub nickname: Option<String>,
    /// Free-form affiliation label.
    pub department: Option<String>,
    /// Current score.
    pub score: i32,
    /// Insertion timestamp.
    pub created_at: Option<PrimitiveDateTime>,
    /// Last score update timestamp.
    pub updated_at: Option<PrimitiveDateTime>,
}

/// Projection used by the per-game leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScoreEntity {
    pub name: String,
    pub score: i32,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

/// Leaderboard row annotated with the three window ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayerEntity {
    pub dense_rank: i64,
    pub rank: i64,
    pub row_number: i64,
    pub name: String,
    pub score: i32,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

/// Top rows of every discovered game table, keyed in discovery order.
pub type TopPlayersEntity = IndexMap<GameTable, Vec<RankedPlayerEntity>>;

/// Row touched by a cross-table operation, tagged with its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlayerEntity {
    pub table: GameTable,
    pub player: PlayerEntity,
}

/// Data row of an import file, ready to be inserted into every game table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowEntity {
    /// 1-based line number in the uploaded file (the header is line 1).
    pub row: usize,
    pub name: String,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

/// Already validated and trimmed member to insert into every game table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemberEntity {
    pub name: String,
    pub nickname: Option<String>,
    pub department: Option<String>,
}

/// Column used to locate the player whose score is updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerKey {
    /// Match on `name`.
    Name(String),
    /// Match on `nickname`.
    Nickname(String),
}

impl PlayerKey {
    /// Value searched for.
    pub fn value(&self) -> &str {
        match self {
            PlayerKey::Name(value) | PlayerKey::Nickname(value) => value,
        }
    }
}

/// Which unique column a new member collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Name,
    Nickname,
}

/// Existing row that blocks an add-member operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberConflict {
    pub table: GameTable,
    pub field: ConflictField,
    pub value: String,
}

impl fmt::Display for MemberConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            ConflictField::Name => "player",
            ConflictField::Nickname => "nickname",
        };
        write!(f, "{field} `{}` already exists in game `{}`", self.value, self.table)
    }
}

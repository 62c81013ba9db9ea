//! Shared data types for the transactional store

mod enums;
mod transactional;

pub use enums::{ActivityAction, BoardRole, ColumnType, EntityKind, UserRole};

pub use transactional::{
    ActivityRow, BoardAccess, BoardRow, BoardWithRole, ColumnDefinition, ColumnRow, ColumnUpdate,
    CommentRow, ItemRow, ItemUpdateResult, ItemValueMap, MemberUpsert, MemberWithUser, MembershipRow,
    MoveOutcome, NewActivity, NewUser, SectionRow, SectionWithCount, UserRow, UserUpdate,
    ValueChange, ValueWrite,
};

//! Shared fixture models for the association test suites.

#![allow(dead_code)]

use relmodel::prelude::*;
use std::cell::Cell;

thread_local! {
    static DESTROY_HOOKS: Cell<usize> = const { Cell::new(0) };
}

/// Number of destroy hooks run on this test thread.
pub fn destroy_hook_count() -> usize {
    DESTROY_HOOKS.with(Cell::get)
}

pub fn reset_destroy_hooks() {
    DESTROY_HOOKS.with(|c| c.set(0));
}

// ---------------------------------------------------------------------------
// Owners
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub guid: Option<i64>,
    pub email: String,
}

impl User {
    pub fn persisted(id: i64) -> Self {
        Self {
            id: Some(id),
            guid: None,
            email: format!("user{id}@example.com"),
        }
    }

    pub fn fresh() -> Self {
        Self {
            id: None,
            guid: None,
            email: "new@example.com".to_string(),
        }
    }
}

impl Record for User {
    const TABLE_NAME: &'static str = "users";
    const MODEL_NAME: &'static str = "User";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id", "id", SqlType::BigInt)
                .primary_key(true)
                .auto_increment(true),
            FieldInfo::new("guid", "guid", SqlType::BigInt).nullable(true),
            FieldInfo::new("email", "email", SqlType::Text),
        ];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("guid", Value::from(self.guid)),
            ("email", Value::from(self.email.clone())),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?.as_i64(),
            guid: row.try_get("guid")?.as_i64(),
            email: row.try_get("email")?.as_str().unwrap_or_default().into(),
        })
    }

    fn primary_key_value(&self) -> Vec<Value> {
        vec![Value::from(self.id)]
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn get_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::from(self.id)),
            "guid" => Some(Value::from(self.guid)),
            "email" => Some(Value::from(self.email.clone())),
            _ => None,
        }
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "id" => self.id = value.as_i64(),
            "guid" => self.guid = value.as_i64(),
            "email" => self.email = value.as_str().unwrap_or_default().into(),
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: Option<i64>,
}

impl Group {
    pub fn persisted(id: i64) -> Self {
        Self { id: Some(id) }
    }
}

impl Record for Group {
    const TABLE_NAME: &'static str = "groups";
    const MODEL_NAME: &'static str = "Group";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[FieldInfo::new("id", "id", SqlType::BigInt)
            .primary_key(true)
            .auto_increment(true)];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![("id", Value::from(self.id))]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?.as_i64(),
        })
    }

    fn primary_key_value(&self) -> Vec<Value> {
        vec![Value::from(self.id)]
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn get_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::from(self.id)),
            _ => None,
        }
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        if column == "id" {
            self.id = value.as_i64();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// The has-one target of `User`. `nickname` requires at least two
/// characters, which the validation-failure tests lean on. The inverse
/// pointer is transient: it never round-trips through the store.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub nickname: String,
    pub kind: Option<String>,
    pub inverse_user_id: Option<i64>,
}

impl Profile {
    pub fn fresh(nickname: &str) -> Self {
        Self {
            id: None,
            user_id: None,
            nickname: nickname.to_string(),
            kind: None,
            inverse_user_id: None,
        }
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.user_id == other.user_id
            && self.nickname == other.nickname
            && self.kind == other.kind
    }
}

impl Record for Profile {
    const TABLE_NAME: &'static str = "profiles";
    const MODEL_NAME: &'static str = "Profile";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id", "id", SqlType::BigInt)
                .primary_key(true)
                .auto_increment(true),
            FieldInfo::new("user_id", "user_id", SqlType::BigInt)
                .nullable(true)
                .foreign_key("users.id"),
            FieldInfo::new("nickname", "nickname", SqlType::Text).min_length(2),
            FieldInfo::new("kind", "kind", SqlType::Text).nullable(true),
        ];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("user_id", Value::from(self.user_id)),
            ("nickname", Value::from(self.nickname.clone())),
            ("kind", Value::from(self.kind.clone())),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?.as_i64(),
            user_id: row.try_get("user_id")?.as_i64(),
            nickname: row.try_get("nickname")?.as_str().unwrap_or_default().into(),
            kind: row.try_get("kind")?.as_str().map(String::from),
            inverse_user_id: None,
        })
    }

    fn primary_key_value(&self) -> Vec<Value> {
        vec![Value::from(self.id)]
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn get_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::from(self.id)),
            "user_id" => Some(Value::from(self.user_id)),
            "nickname" => Some(Value::from(self.nickname.clone())),
            "kind" => Some(Value::from(self.kind.clone())),
            _ => None,
        }
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "id" => self.id = value.as_i64(),
            "user_id" => self.user_id = value.as_i64(),
            "nickname" => self.nickname = value.as_str().unwrap_or_default().into(),
            "kind" => self.kind = value.as_str().map(String::from),
            _ => {}
        }
        Ok(())
    }
}

impl AutoIncrement for Profile {
    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl RecordEvents for Profile {
    fn before_delete(&mut self) -> Result<()> {
        DESTROY_HOOKS.with(|c| c.set(c.get() + 1));
        Ok(())
    }
}

impl HasOneTarget<User> for Profile {
    fn from_attributes(attrs: &AttributeSet) -> Result<Self> {
        Ok(Self {
            id: None,
            user_id: attrs.get("user_id").and_then(Value::as_i64),
            nickname: attrs
                .get("nickname")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .into(),
            kind: attrs.get("kind").and_then(Value::as_str).map(String::from),
            inverse_user_id: None,
        })
    }

    fn set_inverse(&mut self, owner: &User) {
        self.inverse_user_id = owner.id;
    }
}

/// A polymorphic target shared by `User` and `Group` owners, disambiguated
/// by the `record_type` discriminator column.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub id: Option<i64>,
    pub record_id: Option<i64>,
    pub record_type: Option<String>,
    pub path: String,
}

impl Attachment {
    pub fn fresh(path: &str) -> Self {
        Self {
            id: None,
            record_id: None,
            record_type: None,
            path: path.to_string(),
        }
    }

    fn build_from(attrs: &AttributeSet) -> Self {
        Self {
            id: None,
            record_id: attrs.get("record_id").and_then(Value::as_i64),
            record_type: attrs
                .get("record_type")
                .and_then(Value::as_str)
                .map(String::from),
            path: attrs
                .get("path")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .into(),
        }
    }
}

impl Record for Attachment {
    const TABLE_NAME: &'static str = "attachments";
    const MODEL_NAME: &'static str = "Attachment";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id", "id", SqlType::BigInt)
                .primary_key(true)
                .auto_increment(true),
            FieldInfo::new("record_id", "record_id", SqlType::BigInt).nullable(true),
            FieldInfo::new("record_type", "record_type", SqlType::Text).nullable(true),
            FieldInfo::new("path", "path", SqlType::Text),
        ];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("record_id", Value::from(self.record_id)),
            ("record_type", Value::from(self.record_type.clone())),
            ("path", Value::from(self.path.clone())),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?.as_i64(),
            record_id: row.try_get("record_id")?.as_i64(),
            record_type: row.try_get("record_type")?.as_str().map(String::from),
            path: row.try_get("path")?.as_str().unwrap_or_default().into(),
        })
    }

    fn primary_key_value(&self) -> Vec<Value> {
        vec![Value::from(self.id)]
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn get_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::from(self.id)),
            "record_id" => Some(Value::from(self.record_id)),
            "record_type" => Some(Value::from(self.record_type.clone())),
            "path" => Some(Value::from(self.path.clone())),
            _ => None,
        }
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "id" => self.id = value.as_i64(),
            "record_id" => self.record_id = value.as_i64(),
            "record_type" => self.record_type = value.as_str().map(String::from),
            "path" => self.path = value.as_str().unwrap_or_default().into(),
            _ => {}
        }
        Ok(())
    }
}

impl AutoIncrement for Attachment {
    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl RecordEvents for Attachment {}

impl HasOneTarget<User> for Attachment {
    fn from_attributes(attrs: &AttributeSet) -> Result<Self> {
        Ok(Self::build_from(attrs))
    }
}

impl HasOneTarget<Group> for Attachment {
    fn from_attributes(attrs: &AttributeSet) -> Result<Self> {
        Ok(Self::build_from(attrs))
    }
}

// ---------------------------------------------------------------------------
// Reflections and seeding
// ---------------------------------------------------------------------------

pub fn profile_reflection() -> HasOneReflection {
    HasOneReflection::new("profile", "profiles", "Profile", "user_id")
}

pub fn attachment_reflection() -> HasOneReflection {
    HasOneReflection::new("attachment", "attachments", "Attachment", "record_id")
        .polymorphic("record_type")
}

/// Insert a profile row directly, bypassing the association layer.
pub fn seed_profile(
    store: &mut MemoryStore<Profile>,
    user_id: Option<i64>,
    nickname: &str,
) -> Profile {
    let mut profile = Profile {
        id: None,
        user_id,
        nickname: nickname.to_string(),
        kind: None,
        inverse_user_id: None,
    };
    store.insert(&mut profile).expect("seed profile");
    profile
}

/// Insert a profile row with a kind tag.
pub fn seed_kind_profile(
    store: &mut MemoryStore<Profile>,
    user_id: Option<i64>,
    nickname: &str,
    kind: &str,
) -> Profile {
    let mut profile = Profile {
        id: None,
        user_id,
        nickname: nickname.to_string(),
        kind: Some(kind.to_string()),
        inverse_user_id: None,
    };
    store.insert(&mut profile).expect("seed profile");
    profile
}

/// Insert an attachment row directly.
pub fn seed_attachment(
    store: &mut MemoryStore<Attachment>,
    record_id: Option<i64>,
    record_type: Option<&str>,
    path: &str,
) -> Attachment {
    let mut attachment = Attachment {
        id: None,
        record_id,
        record_type: record_type.map(String::from),
        path: path.to_string(),
    };
    store.insert(&mut attachment).expect("seed attachment");
    attachment
}

/// Fetch a profile row by primary key, straight from the store.
pub fn profile_by_id(store: &mut MemoryStore<Profile>, id: i64) -> Option<Profile> {
    store
        .select_first(&SelectOne::new().filter(Expr::col("id").eq(id)))
        .expect("select profile")
}

use std::collections::BTreeMap;

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use super::model::AudioSession;

/// A persisted session attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    FilePath,
    TimeStamp,
    Duration,
    SpendTime,
    FinishedTimes,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Name,
        Column::FilePath,
        Column::TimeStamp,
        Column::Duration,
        Column::SpendTime,
        Column::FinishedTimes,
    ];

    /// Column name in the `audio` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::FilePath => "file_path",
            Column::TimeStamp => "time_stamp",
            Column::Duration => "duration",
            Column::SpendTime => "spend_time",
            Column::FinishedTimes => "finished_times",
        }
    }

    /// Read this attribute from `session` in its stored form.
    fn value_of(self, session: &AudioSession) -> FieldValue {
        match self {
            Column::Name => FieldValue::Text(session.name.clone()),
            Column::FilePath => FieldValue::Text(session.file_path.to_string_lossy().into_owned()),
            Column::TimeStamp => FieldValue::Text(session.time_stamp_text()),
            Column::Duration => FieldValue::Integer(session.duration as i64),
            Column::SpendTime => FieldValue::Integer(session.spend_time as i64),
            Column::FinishedTimes => FieldValue::Integer(i64::from(session.finished_times)),
        }
    }
}

/// A value as written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

#[cfg(test)]
impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

#[cfg(test)]
impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Text(s) => ToSqlOutput::from(s.as_str()),
            FieldValue::Integer(i) => ToSqlOutput::from(*i),
        })
    }
}

/// Changed attributes between two session snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiff(BTreeMap<Column, FieldValue>);

impl SessionDiff {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, column: Column) -> Option<&FieldValue> {
        self.0.get(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &FieldValue)> {
        self.0.iter().map(|(c, v)| (*c, v))
    }
}

impl FromIterator<(Column, FieldValue)> for SessionDiff {
    fn from_iter<I: IntoIterator<Item = (Column, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compare every column and keep `other`'s value where it differs.
pub(super) fn diff(current: &AudioSession, other: &AudioSession) -> SessionDiff {
    Column::ALL
        .into_iter()
        .filter_map(|column| {
            let theirs = column.value_of(other);
            (column.value_of(current) != theirs).then_some((column, theirs))
        })
        .collect()
}

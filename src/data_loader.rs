use std::collections::HashSet;
use std::path::Path;
use crate::error::{LeagueError, Result};
use crate::util::*;

pub const NAME_FIELD: &str = "Name";
pub const STRENGTH_FIELD: &str = "Strength";

// A team is its name plus whatever columns the input table carried, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    pub attributes: Vec<(String, Value)>,
}

impl Team {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn set_attribute(&mut self, key: &str, value: Value) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn numeric(&self, key: &str) -> Result<i64> {
        let value = self.attribute(key).ok_or_else(|| LeagueError::MissingAttribute {
            team: self.name.clone(),
            attribute: key.to_string(),
        })?;

        value.as_int().ok_or_else(|| LeagueError::NotNumeric {
            team: self.name.clone(),
            attribute: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn strength(&self) -> Result<i64> {
        self.numeric(STRENGTH_FIELD)
    }

    pub fn adjust(&mut self, key: &str, delta: i64) -> Result<()> {
        let current = self.numeric(key)?;
        let adjusted = current.checked_add(delta).ok_or_else(|| LeagueError::Overflow {
            team: self.name.clone(),
            attribute: key.to_string(),
        })?;
        self.set_attribute(key, Value::Int(adjusted));
        Ok(())
    }
}

// Loads teams from a CSV file with a header row. Every cell that parses as an integer is stored as one.
pub fn load_teams(file_path: impl AsRef<Path>) -> Result<Vec<Team>> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    build_teams(&fields, rows)
}

// Takes the table handed over by a team editor: the first row holds the field names, the rest are teams.
pub fn teams_from_table(mut table: Vec<Vec<String>>) -> Result<Vec<Team>> {
    if table.is_empty() {
        return Err(LeagueError::EmptyTable);
    }

    let fields = table.remove(0);
    build_teams(&fields, table)
}

fn build_teams(fields: &[String], rows: Vec<Vec<String>>) -> Result<Vec<Team>> {
    if !fields.iter().any(|f| f == NAME_FIELD) {
        return Err(LeagueError::MissingAttribute {
            team: "header".to_string(),
            attribute: NAME_FIELD.to_string(),
        });
    }

    let mut teams = Vec::new();
    let mut seen = HashSet::new();

    for (row_idx, row) in rows.into_iter().enumerate() {
        let mut name = None;
        let mut attributes = Vec::new();

        for (field, cell) in fields.iter().zip(row) {
            if field == NAME_FIELD {
                name = Some(cell);
            } else {
                attributes.push((field.clone(), parse_value(&cell)));
            }
        }

        // Short rows can drop the name column entirely
        let name = name.ok_or_else(|| LeagueError::MissingAttribute {
            team: format!("row {}", row_idx + 1),
            attribute: NAME_FIELD.to_string(),
        })?;

        if !seen.insert(name.clone()) {
            return Err(LeagueError::DuplicateTeam(name));
        }

        teams.push(Team { name, attributes });
    }

    Ok(teams)
}

// Writes the teams back out in the same shape load_teams reads.
pub fn save_teams(file_path: impl AsRef<Path>, teams: &[Team]) -> Result<()> {
    let mut fields: Vec<String> = vec![NAME_FIELD.to_string()];
    for t in teams {
        for (k, _) in &t.attributes {
            if !fields.contains(k) { fields.push(k.clone()); }
        }
    }

    let mut writer = csv::Writer::from_path(file_path)?;
    writer.write_record(&fields)?;

    for t in teams {
        let mut row = vec![t.name.clone()];
        for field in &fields[1..] {
            row.push(t.attribute(field).map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

use std::fs::File;
use std::io::Read;
use chrono::{DateTime, Utc};
use crate::core::config::Config;
use crate::core::database::{Database, DatabaseBuilder};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Mutation, PANGO_SEPARATOR};

// Columns of the aggregated CSV
const AREA: usize = 0;
const DATE: usize = 1;
const PANGO_CLADE: usize = 3;
const MUTATIONS: usize = 4;
const COUNT: usize = 5;
const COLUMNS: usize = 6;

impl Database {
    /// Loads `config.data_path` into a frozen store.
    pub fn open(config: &Config) -> Result<Self> {
        let file = File::open(&config.data_path).map_err(|e| {
            Error::new(
                ErrorKind::Io,
                format!("couldn't open {}: {}", config.data_path.display(), e),
            )
        })?;
        let modified = file.metadata()?.modified()?;
        let millis = DateTime::<Utc>::from(modified).timestamp_millis();

        let builder = Database::builder(&config.mutation_separator).last_modified(millis);
        load_into(builder, file, config)
    }
}

/// Reads headerless rows `area,date,lineage,pango_clade,mutations,count`.
pub fn load_csv<R: Read>(reader: R, config: &Config) -> Result<Database> {
    load_into(Database::builder(&config.mutation_separator), reader, config)
}

fn load_into<R: Read>(mut builder: DatabaseBuilder, reader: R, config: &Config) -> Result<Database> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut row = csv::StringRecord::new();
    let mut line = 0;
    let mut clade = String::new();
    while rdr.read_record(&mut row)? {
        line += 1;
        if row.len() != COLUMNS {
            return Err(Error::parse(format!(
                "line {}: expected {} columns, found {}",
                line, COLUMNS, row.len()
            )));
        }

        let count: u64 = row[COUNT].trim().parse().map_err(|_| {
            Error::parse(format!("line {}: invalid count {:?}", line, &row[COUNT]))
        })?;

        let mutations = split_mutations(&row[MUTATIONS], config, line)?;

        // Clades are matched by prefix, so they must end on a level boundary
        clade.clear();
        clade.push_str(&row[PANGO_CLADE]);
        if !clade.ends_with(PANGO_SEPARATOR) {
            clade.push(PANGO_SEPARATOR);
        }

        builder
            .add_record(&row[AREA], &row[DATE], &clade, &mutations, count)
            .map_err(|e| Error::new(e.kind, format!("line {}: {}", line, e.context)))?;
    }

    Ok(builder.finish())
}

fn split_mutations<'a>(field: &'a str, config: &Config, line: usize) -> Result<Vec<&'a str>> {
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field
        .split(config.mutation_list_separator.as_str())
        .map(|m| match Mutation::parse(m, &config.mutation_separator) {
            Some(_) => Ok(m),
            None => Err(Error::parse(format!("line {}: malformed mutation {:?}", line, m))),
        })
        .collect()
}

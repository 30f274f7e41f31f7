//! [`SqliteStore`]: the SQLite implementation of [`ProjectStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tract_core::{
  project::{NewProject, Project, ProjectPatch},
  store::{Page, ProjectPage, ProjectStore},
};

use crate::{
  Result,
  encode::{RawProject, encode_date, encode_uuid},
  schema::{SCHEMA, UNIQUE_NAMES_OFF, UNIQUE_NAMES_ON},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Schema switches applied when the store is opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
  /// Reject a second project with the same name.
  pub unique_names: bool,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A project store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(options).await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory(options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(options).await?;
    Ok(store)
  }

  async fn init_schema(&self, options: StoreOptions) -> Result<()> {
    let names_ddl = if options.unique_names {
      UNIQUE_NAMES_ON
    } else {
      UNIQUE_NAMES_OFF
    };

    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(names_ddl)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ProjectStore impl ───────────────────────────────────────────────────────

impl ProjectStore for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, input: NewProject) -> Result<Project> {
    let project = Project {
      id:               Uuid::new_v4(),
      name:             input.name,
      description:      input.description,
      start_date:       input.start_date,
      end_date:         input.end_date,
      area_of_interest: input.area_of_interest,
    };

    let id_str      = encode_uuid(project.id);
    let name        = project.name.clone();
    let description = project.description.clone();
    let start_str   = encode_date(project.start_date)?;
    let end_str     = encode_date(project.end_date)?;
    let area_json   = project.area_of_interest.to_json()?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (
             project_id, name, description, start_date, end_date, area_of_interest
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, description, start_str, end_str, area_json],
        )?;
        Ok(())
      })
      .await?;

    Ok(project)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Project>> {
    let id_str = encode_uuid(id);
    let sql    = format!(
      "SELECT {} FROM projects WHERE project_id = ?1",
      RawProject::COLUMNS
    );

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], RawProject::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Option<Project>> {
    // A single statement, so the table constraints see the merged row.
    let id_str          = encode_uuid(id);
    let name            = patch.name;
    let set_description = patch.description.is_some();
    let description     = patch.description.flatten();
    let start_str       = patch.start_date.map(encode_date).transpose()?;
    let end_str         = patch.end_date.map(encode_date).transpose()?;
    let area_json       = patch
      .area_of_interest
      .as_ref()
      .map(|area| area.to_json())
      .transpose()?;
    let sql             = format!(
      "UPDATE projects SET
         name             = COALESCE(?2, name),
         description      = CASE WHEN ?3 THEN ?4 ELSE description END,
         start_date       = COALESCE(?5, start_date),
         end_date         = COALESCE(?6, end_date),
         area_of_interest = COALESCE(?7, area_of_interest)
       WHERE project_id = ?1
       RETURNING {}",
      RawProject::COLUMNS
    );

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &sql,
            rusqlite::params![
              id_str,
              name,
              set_description,
              description,
              start_str,
              end_str,
              area_json,
            ],
            RawProject::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM projects WHERE project_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn list(&self, page: Page) -> Result<ProjectPage> {
    let limit  = i64::from(page.limit);
    let offset = i64::from(page.offset);
    let sql    = format!(
      "SELECT {} FROM projects ORDER BY rowid LIMIT ?1 OFFSET ?2",
      RawProject::COLUMNS
    );

    let (raws, total): (Vec<RawProject>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?;

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawProject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawProject::into_project)
      .collect::<Result<Vec<_>>>()?;

    Ok(ProjectPage {
      items,
      total: u64::try_from(total).unwrap_or_default(),
    })
  }
}

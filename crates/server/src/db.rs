use crate::error::{Result, ServerError};
use recruit_model::TagId;
use recruit_protocol::{DataList, MatchMode, OperatorRow, SetupPayload, SetupReport, TagRow};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS operators (
    id TEXT PRIMARY KEY,
    appellation TEXT,
    name_zh TEXT,
    name_ja TEXT,
    name_en TEXT,
    rarity TEXT,
    profession TEXT,
    subProfessionId TEXT,
    position TEXT,
    IsRecruitOnly BOOLEAN
);
CREATE TABLE IF NOT EXISTS recruitment_tags (
    id INTEGER PRIMARY KEY,
    name_zh TEXT,
    name_en TEXT,
    name_jp TEXT
);
CREATE TABLE IF NOT EXISTS operators_tags (
    operator_id TEXT,
    tag_id INTEGER,
    PRIMARY KEY (operator_id, tag_id),
    FOREIGN KEY (operator_id) REFERENCES operators(id),
    FOREIGN KEY (tag_id) REFERENCES recruitment_tags(id)
);
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

const OPERATOR_COLUMNS: &str = "o.id, o.appellation, o.name_zh, o.name_ja, o.name_en, \
     o.rarity, o.profession, o.subProfessionId, o.position, o.IsRecruitOnly";

const META_TAGS: &str = "tags";
const META_OPERATORS: &str = "operators";

/// Location of the SQLite file. Every request opens its own connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Open a connection and make sure the schema exists.
    pub fn init(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = self.connect()?;
        create_schema(&conn)?;
        log::info!("Database ready at {}", self.path.display());
        Ok(())
    }
}

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn list_tags(conn: &Connection) -> Result<Vec<TagRow>> {
    let mut stmt =
        conn.prepare("SELECT id, name_zh, name_en, name_jp FROM recruitment_tags ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(TagRow {
            id: row.get(0)?,
            name_zh: row.get(1)?,
            name_en: row.get(2)?,
            name_jp: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn list_operators(conn: &Connection) -> Result<Vec<OperatorRow>> {
    let sql = format!("SELECT {OPERATOR_COLUMNS} FROM operators o ORDER BY o.id");
    let mut operators = query_operators(conn, &sql, Vec::new())?;
    attach_tags(conn, &mut operators)?;
    Ok(operators)
}

/// Operators linked to all (or any) of `tag_ids`.
pub fn operators_by_tags(
    conn: &Connection,
    tag_ids: &[TagId],
    mode: MatchMode,
) -> Result<Vec<OperatorRow>> {
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; tag_ids.len()].join(", ");
    let mut values: Vec<i64> = tag_ids.iter().map(|&id| i64::from(id)).collect();

    let sql = match mode {
        MatchMode::Any => format!(
            "SELECT DISTINCT {OPERATOR_COLUMNS} FROM operators o \
             JOIN operators_tags ot ON o.id = ot.operator_id \
             WHERE ot.tag_id IN ({placeholders}) ORDER BY o.id"
        ),
        MatchMode::All => {
            values.push(tag_ids.len() as i64);
            format!(
                "SELECT {OPERATOR_COLUMNS} FROM operators o \
                 JOIN operators_tags ot ON o.id = ot.operator_id \
                 WHERE ot.tag_id IN ({placeholders}) \
                 GROUP BY o.id HAVING COUNT(DISTINCT ot.tag_id) = ? ORDER BY o.id"
            )
        }
    };

    let mut operators = query_operators(conn, &sql, values)?;
    attach_tags(conn, &mut operators)?;
    log::debug!(
        "{} operators match {tag_ids:?} ({mode})",
        operators.len()
    );
    Ok(operators)
}

/// Create the tables and upsert the payload in one transaction.
pub fn apply_setup(conn: &mut Connection, payload: &SetupPayload) -> Result<SetupReport> {
    create_schema(conn)?;
    let tx = conn.transaction()?;
    {
        let mut op_stmt = tx.prepare(
            "INSERT INTO operators (id, appellation, name_zh, name_ja, name_en, rarity, \
                 profession, subProfessionId, position, IsRecruitOnly)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                 appellation = excluded.appellation,
                 name_zh = excluded.name_zh,
                 name_ja = excluded.name_ja,
                 name_en = excluded.name_en,
                 rarity = excluded.rarity,
                 profession = excluded.profession,
                 subProfessionId = excluded.subProfessionId,
                 position = excluded.position,
                 IsRecruitOnly = excluded.IsRecruitOnly",
        )?;
        let mut tag_stmt = tx.prepare(
            "INSERT INTO recruitment_tags (id, name_zh, name_en, name_jp)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 name_zh = excluded.name_zh,
                 name_en = excluded.name_en,
                 name_jp = excluded.name_jp",
        )?;
        let mut link_stmt = tx.prepare(
            "INSERT OR IGNORE INTO operators_tags (operator_id, tag_id) VALUES (?1, ?2)",
        )?;

        for op in &payload.recruitment_list.data {
            op_stmt.execute(params![
                op.id,
                op.appellation,
                op.name_zh,
                op.name_ja,
                op.name_en,
                op.rarity,
                op.profession,
                op.sub_profession_id,
                op.position,
                op.is_recruit_only,
            ])?;
            for tag_id in &op.tags {
                link_stmt.execute(params![op.id, tag_id])?;
            }
        }
        for tag in &payload.tags.data {
            tag_stmt.execute(params![tag.id, tag.name_zh, tag.name_en, tag.name_jp])?;
        }

        if let Some(ts) = &payload.tags.updated_at {
            set_meta(&tx, META_TAGS, ts)?;
        }
        if let Some(ts) = &payload.recruitment_list.updated_at {
            set_meta(&tx, META_OPERATORS, ts)?;
        }
    }
    tx.commit()?;

    let report = SetupReport {
        status: "Tags populated successfully.".to_string(),
        tags: payload.tags.data.len(),
        operators: payload.recruitment_list.data.len(),
    };
    log::info!(
        "Setup stored {} tags and {} operators",
        report.tags,
        report.operators
    );
    Ok(report)
}

/// Everything stored, in setup-payload form, with the recorded timestamps.
pub fn export_bundle(conn: &Connection) -> Result<SetupPayload> {
    Ok(SetupPayload {
        tags: DataList {
            updated_at: get_meta(conn, META_TAGS)?,
            data: list_tags(conn)?,
        },
        recruitment_list: DataList {
            updated_at: get_meta(conn, META_OPERATORS)?,
            data: list_operators(conn)?,
        },
    })
}

fn query_operators(conn: &Connection, sql: &str, values: Vec<i64>) -> Result<Vec<OperatorRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(values), operator_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn operator_row(row: &Row<'_>) -> rusqlite::Result<OperatorRow> {
    Ok(OperatorRow {
        id: row.get(0)?,
        appellation: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        name_zh: row.get(2)?,
        name_ja: row.get(3)?,
        name_en: row.get(4)?,
        rarity: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        profession: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        sub_profession_id: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        position: row.get(8)?,
        is_recruit_only: row.get::<_, Option<bool>>(9)?.unwrap_or(false),
        tags: Vec::new(),
    })
}

fn attach_tags(conn: &Connection, operators: &mut [OperatorRow]) -> Result<()> {
    let mut stmt = conn
        .prepare("SELECT tag_id FROM operators_tags WHERE operator_id = ?1 ORDER BY tag_id")?;
    for op in operators.iter_mut() {
        let ids = stmt.query_map([&op.id], |row| row.get::<_, TagId>(0))?;
        op.tags = ids.collect::<rusqlite::Result<Vec<_>>>()?;
    }
    Ok(())
}

fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| row.get(0))
        .optional()
        .map_err(ServerError::from)
}

fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

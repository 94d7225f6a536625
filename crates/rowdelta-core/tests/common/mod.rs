use chrono::NaiveDate;
use rowdelta_core::{DataSource, MemoryLoader, RawValue, Snapshot};
use uuid::Uuid;

/// Column layout of the `actor` table used across scenarios
#[allow(dead_code)]
pub const ACTOR_COLUMNS: [&str; 5] = ["id", "name", "firstname", "birth", "actor_imdb"];

fn date(y: i32, m: u32, d: u32) -> RawValue {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(RawValue::Date)
        .unwrap_or(RawValue::Null)
}

fn imdb(text: &str) -> RawValue {
    Uuid::parse_str(text)
        .map(RawValue::Uuid)
        .unwrap_or(RawValue::Null)
}

/// Full `actor` tuple for one of the three seeded actors
#[allow(dead_code)]
pub fn actor_tuple(id: i32) -> Vec<RawValue> {
    let (name, firstname, birth, imdb_id) = match id {
        1 => (
            "Weaver",
            "Sigourney",
            date(1949, 10, 8),
            "30b443ae-c0c9-4790-9bec-ce1380808435",
        ),
        2 => (
            "Phoenix",
            "Joaquim",
            date(1974, 10, 28),
            "16319617-ae95-4087-9264-d3d21bf611b6",
        ),
        3 => (
            "Worthington",
            "Sam",
            date(1976, 8, 2),
            "d735221b-5de5-4112-aa1e-49090cb75ada",
        ),
        _ => ("Murray", "Bill", date(1950, 9, 21), "ed1c5ad9-0b0b-4e8f-9d4c-3e0e7a6a3d9d"),
    };
    vec![
        RawValue::I32(id),
        RawValue::from(name),
        RawValue::from(firstname),
        birth,
        imdb(imdb_id),
    ]
}

/// Loader holding the `actor` table with the three seeded actors
#[allow(dead_code)]
pub fn actor_loader() -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    loader.create_table("actor", ACTOR_COLUMNS, ["id"]);
    for id in 1..=3 {
        loader.insert("actor", actor_tuple(id)).unwrap();
    }
    loader
}

/// Two-column `actor` snapshot, `(id, name)` keyed by id
#[allow(dead_code)]
pub fn names_snapshot(rows: &[(i32, &str)]) -> Snapshot {
    names_snapshot_keyed(rows, &["id"])
}

/// Two-column `actor` snapshot with an explicit key (possibly none)
#[allow(dead_code)]
pub fn names_snapshot_keyed(rows: &[(i32, &str)], pk: &[&str]) -> Snapshot {
    let tuples = rows
        .iter()
        .map(|(id, name)| vec![RawValue::I32(*id), RawValue::from(*name)])
        .collect();
    Snapshot::new(
        DataSource::table("actor"),
        ["id", "name"],
        pk.iter().copied(),
        tuples,
    )
    .unwrap()
}

/// Before/after pair of the reference scenario:
/// 2 renamed, 3 deleted, 4 created
#[allow(dead_code)]
pub fn reference_pair() -> (Snapshot, Snapshot) {
    let before = names_snapshot(&[(1, "Weaver"), (2, "Phoenix"), (3, "Worthington")]);
    let after = names_snapshot(&[(1, "Weaver"), (2, "Phoenix-updated"), (4, "Murray")]);
    (before, after)
}

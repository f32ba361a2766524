//! Persistence for readings, usage statistics, and group definitions
//!
//! Uses SQLite for local storage of:
//! - Flow readings (sampled history)
//! - Daily aggregated usage statistics
//! - The group-definitions document (a single JSON record, mirroring the
//!   document-store shape the groups originally lived in)

use crate::core::{Error, FlowReading, Result};
use crate::tariff::TariffEngine;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Mapping of group name to member endpoint ids
pub type GroupMap = HashMap<String, Vec<String>>;

/// Narrow repository interface for the group-definitions record.
/// Implementations must surface failures untouched; callers decide how to
/// react without losing in-memory state.
pub trait GroupRepository {
    fn load_groups(&self) -> Result<GroupMap>;
    fn save_groups(&self, groups: &GroupMap) -> Result<()>;
}

/// SQLite-backed store
pub struct Store {
    conn: Connection,
}

/// Daily usage statistics record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    pub total_usage: f64,
    pub total_cost: Option<f64>,
    pub avg_flow: f64,
    pub max_flow: f64,
    pub region: Option<String>,
    pub usage_class: Option<String>,
}

const GROUPS_KEY: &str = "groups";

impl Store {
    /// Open (or create) the on-disk store
    pub fn new() -> Result<Self> {
        let db_path = Self::db_path()?;
        let conn = Connection::open(&db_path)?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory store, used by tests and throwaway runs
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database file path
    fn db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;

        let app_dir = data_dir.join("waterflow-monitor");
        std::fs::create_dir_all(&app_dir)?;

        Ok(app_dir.join("data.db"))
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Flow reading history
            CREATE TABLE IF NOT EXISTS flow_readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                endpoint_id TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                flow_rate REAL NOT NULL
            );

            -- Daily aggregates
            CREATE TABLE IF NOT EXISTS daily_stats (
                date TEXT PRIMARY KEY,
                total_usage REAL NOT NULL,
                total_cost REAL,
                avg_flow REAL,
                max_flow REAL,
                region TEXT,
                usage_class TEXT
            );

            -- Single-record documents (group definitions)
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_readings_timestamp ON flow_readings(timestamp);
            CREATE INDEX IF NOT EXISTS idx_readings_endpoint ON flow_readings(endpoint_id, timestamp);
            "#,
        )?;

        Ok(())
    }

    /// Insert a single flow reading
    pub fn insert_reading(&self, reading: &FlowReading) -> Result<()> {
        self.conn.execute(
            "INSERT INTO flow_readings (endpoint_id, timestamp, flow_rate) VALUES (?1, ?2, ?3)",
            params![reading.endpoint_id, reading.timestamp, reading.flow_rate],
        )?;

        Ok(())
    }

    /// Insert a batch of readings in one transaction
    pub fn insert_readings(&mut self, readings: &[FlowReading]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO flow_readings (endpoint_id, timestamp, flow_rate) VALUES (?1, ?2, ?3)",
            )?;
            for reading in readings {
                stmt.execute(params![
                    reading.endpoint_id,
                    reading.timestamp,
                    reading.flow_rate
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    /// Get all readings in a time range, oldest first
    pub fn get_readings(&self, start: i64, end: i64) -> Result<Vec<FlowReading>> {
        let mut stmt = self.conn.prepare(
            "SELECT endpoint_id, timestamp, flow_rate
             FROM flow_readings
             WHERE timestamp >= ?1 AND timestamp <= ?2
             ORDER BY timestamp ASC, endpoint_id ASC",
        )?;

        let readings = stmt
            .query_map(params![start, end], |row| {
                Ok(FlowReading {
                    endpoint_id: row.get(0)?,
                    timestamp: row.get(1)?,
                    flow_rate: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(readings)
    }

    /// Get one endpoint's readings in a time range, oldest first
    pub fn get_endpoint_readings(
        &self,
        endpoint_id: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<FlowReading>> {
        let mut stmt = self.conn.prepare(
            "SELECT endpoint_id, timestamp, flow_rate
             FROM flow_readings
             WHERE endpoint_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3
             ORDER BY timestamp ASC",
        )?;

        let readings = stmt
            .query_map(params![endpoint_id, start, end], |row| {
                Ok(FlowReading {
                    endpoint_id: row.get(0)?,
                    timestamp: row.get(1)?,
                    flow_rate: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(readings)
    }

    /// Delete readings older than the given number of days
    pub fn cleanup_old_readings(&self, days_to_keep: u32) -> Result<u64> {
        let cutoff = chrono::Utc::now().timestamp() - (days_to_keep as i64 * 24 * 60 * 60);

        let deleted = self.conn.execute(
            "DELETE FROM flow_readings WHERE timestamp < ?1",
            params![cutoff],
        )?;

        Ok(deleted as u64)
    }

    /// Get total readings count
    pub fn readings_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flow_readings", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update or insert daily statistics
    pub fn upsert_daily_stats(&self, stats: &DailyStats) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO daily_stats (date, total_usage, total_cost, avg_flow, max_flow, region, usage_class)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(date) DO UPDATE SET
                   total_usage = ?2,
                   total_cost = ?3,
                   avg_flow = ?4,
                   max_flow = ?5,
                   region = ?6,
                   usage_class = ?7"#,
            params![
                stats.date,
                stats.total_usage,
                stats.total_cost,
                stats.avg_flow,
                stats.max_flow,
                stats.region,
                stats.usage_class
            ],
        )?;

        Ok(())
    }

    /// Get daily statistics for a date range (dates formatted `%Y-%m-%d`)
    pub fn get_daily_stats(&self, start: &str, end: &str) -> Result<Vec<DailyStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, total_usage, total_cost, avg_flow, max_flow, region, usage_class
             FROM daily_stats
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC",
        )?;

        let stats = stmt
            .query_map(params![start, end], |row| {
                Ok(DailyStats {
                    date: row.get(0)?,
                    total_usage: row.get(1)?,
                    total_cost: row.get(2)?,
                    avg_flow: row.get(3)?,
                    max_flow: row.get(4)?,
                    region: row.get(5)?,
                    usage_class: row.get(6)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(stats)
    }

    /// Recompute a date's statistics from the raw readings and price the
    /// usage under the given tariff selection.
    ///
    /// Readings are instantaneous rates sampled on a fixed cadence, so each
    /// stored reading is treated as covering `secs_per_reading` seconds of
    /// flow at that rate.
    pub fn update_daily_stats_for_date(
        &self,
        date: &str,
        secs_per_reading: f64,
        region: &str,
        usage_class: &str,
        engine: &TariffEngine,
    ) -> Result<Option<DailyStats>> {
        let start_of_day = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| Error::Config(format!("Invalid date '{}': {}", date, e)))?
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        let end_of_day = start_of_day + 86400;

        let (avg_flow, max_flow, sum_flow, count): (f64, f64, f64, i64) = self.conn.query_row(
            "SELECT
                COALESCE(AVG(flow_rate), 0.0),
                COALESCE(MAX(flow_rate), 0.0),
                COALESCE(SUM(flow_rate), 0.0),
                COUNT(*)
             FROM flow_readings
             WHERE timestamp >= ?1 AND timestamp < ?2",
            params![start_of_day, end_of_day],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        if count == 0 {
            return Ok(None);
        }

        // Rates are per-hour; one reading stands for secs_per_reading
        // seconds of flow at that rate.
        let total_usage = sum_flow * secs_per_reading / 3600.0;

        let total_cost = match engine.compute_bill_for(region, usage_class, total_usage) {
            Ok(bill) => Some(bill.total),
            Err(e) => {
                log::warn!("Could not price usage for {}: {}", date, e);
                None
            }
        };

        let stats = DailyStats {
            date: date.to_string(),
            total_usage,
            total_cost,
            avg_flow,
            max_flow,
            region: Some(region.to_string()),
            usage_class: Some(usage_class.to_string()),
        };

        self.upsert_daily_stats(&stats)?;
        Ok(Some(stats))
    }

    /// Recompute today's statistics
    pub fn update_today_stats(
        &self,
        secs_per_reading: f64,
        region: &str,
        usage_class: &str,
        engine: &TariffEngine,
    ) -> Result<Option<DailyStats>> {
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        self.update_daily_stats_for_date(&today, secs_per_reading, region, usage_class, engine)
    }

    /// Usage per hour of one date, 24 buckets
    pub fn get_hourly_usage(&self, date: &str, secs_per_reading: f64) -> Result<[f64; 24]> {
        let mut stmt = self.conn.prepare(
            "SELECT CAST(strftime('%H', timestamp, 'unixepoch') AS INTEGER), SUM(flow_rate)
             FROM flow_readings
             WHERE date(timestamp, 'unixepoch') = ?1
             GROUP BY 1",
        )?;

        let mut hourly = [0.0f64; 24];
        let rows = stmt.query_map(params![date], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })?;

        for row in rows.filter_map(|r| r.ok()) {
            let (hour, sum_flow) = row;
            if (0..24).contains(&hour) {
                hourly[hour as usize] = sum_flow * secs_per_reading / 3600.0;
            }
        }

        Ok(hourly)
    }

    /// Usage per month of one year, 12 buckets, from the daily aggregates
    pub fn get_monthly_usage(&self, year: i32) -> Result<[f64; 12]> {
        let mut stmt = self.conn.prepare(
            "SELECT CAST(substr(date, 6, 2) AS INTEGER), SUM(total_usage)
             FROM daily_stats
             WHERE substr(date, 1, 4) = ?1
             GROUP BY 1",
        )?;

        let mut monthly = [0.0f64; 12];
        let rows = stmt.query_map(params![format!("{:04}", year)], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })?;

        for row in rows.filter_map(|r| r.ok()) {
            let (month, usage) = row;
            if (1..=12).contains(&month) {
                monthly[(month - 1) as usize] = usage;
            }
        }

        Ok(monthly)
    }

    /// Usage per year across every recorded year, oldest first
    pub fn get_yearly_usage(&self) -> Result<Vec<(i32, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT CAST(substr(date, 1, 4) AS INTEGER), SUM(total_usage)
             FROM daily_stats
             GROUP BY 1
             ORDER BY 1 ASC",
        )?;

        let yearly = stmt
            .query_map([], |row| Ok((row.get::<_, i32>(0)?, row.get::<_, f64>(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(yearly)
    }
}

impl GroupRepository for Store {
    /// Load the group-definitions document; an absent record is an empty map
    fn load_groups(&self) -> Result<GroupMap> {
        let result: std::result::Result<String, rusqlite::Error> = self.conn.query_row(
            "SELECT value FROM documents WHERE key = ?1",
            params![GROUPS_KEY],
            |row| row.get(0),
        );

        match result {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| Error::Serialization(format!("groups document: {}", e))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(GroupMap::new()),
            Err(e) => Err(Error::Store(e)),
        }
    }

    /// Write the whole group-definitions document in one shot
    fn save_groups(&self, groups: &GroupMap) -> Result<()> {
        let json = serde_json::to_string(groups)
            .map_err(|e| Error::Serialization(format!("groups document: {}", e)))?;

        self.conn.execute(
            "INSERT INTO documents (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![GROUPS_KEY, json],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TariffConfig;

    fn engine() -> TariffEngine {
        TariffEngine::new(&TariffConfig::default()).unwrap()
    }

    #[test]
    fn insert_and_get_reading() {
        let store = Store::in_memory().unwrap();

        store
            .insert_reading(&FlowReading::at("EP_1", 1_700_000_000, 42.0))
            .unwrap();

        let readings = store.get_readings(0, i64::MAX).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].endpoint_id, "EP_1");
        assert!((readings[0].flow_rate - 42.0).abs() < 1e-9);
    }

    #[test]
    fn batch_insert_and_endpoint_filter() {
        let mut store = Store::in_memory().unwrap();

        let batch = vec![
            FlowReading::at("EP_1", 1_700_000_000, 10.0),
            FlowReading::at("EP_2", 1_700_000_000, 20.0),
            FlowReading::at("EP_1", 1_700_000_002, 12.0),
        ];
        store.insert_readings(&batch).unwrap();

        assert_eq!(store.readings_count().unwrap(), 3);

        let ep1 = store
            .get_endpoint_readings("EP_1", 0, i64::MAX)
            .unwrap();
        assert_eq!(ep1.len(), 2);
        assert!(ep1.iter().all(|r| r.endpoint_id == "EP_1"));
    }

    #[test]
    fn daily_stats_roundtrip() {
        let store = Store::in_memory().unwrap();

        let stats = DailyStats {
            date: "2024-06-15".into(),
            total_usage: 340.0,
            total_cost: Some(51_300.0),
            avg_flow: 55.0,
            max_flow: 98.0,
            region: Some("seoul".into()),
            usage_class: Some("household".into()),
        };

        store.upsert_daily_stats(&stats).unwrap();

        let retrieved = store.get_daily_stats("2024-06-01", "2024-06-30").unwrap();
        assert_eq!(retrieved.len(), 1);
        assert_eq!(retrieved[0].date, "2024-06-15");
        assert_eq!(retrieved[0].total_cost, Some(51_300.0));
    }

    #[test]
    fn daily_stats_recomputed_from_readings() {
        let mut store = Store::in_memory().unwrap();

        // 2024-06-15 00:00:00 UTC
        let base = 1_718_409_600i64;
        let batch: Vec<FlowReading> = (0..6)
            .map(|i| FlowReading::at("EP_1", base + i * 10, 60.0 + i as f64))
            .collect();
        store.insert_readings(&batch).unwrap();

        let result = store
            .update_daily_stats_for_date("2024-06-15", 10.0, "seoul", "household", &engine())
            .unwrap();
        let stats = result.unwrap();

        assert_eq!(stats.date, "2024-06-15");
        assert!(stats.avg_flow > 0.0);
        assert!(stats.max_flow >= stats.avg_flow);
        assert!(stats.total_usage > 0.0);
        assert!(stats.total_cost.unwrap() > 0.0);

        let retrieved = store.get_daily_stats("2024-06-15", "2024-06-15").unwrap();
        assert_eq!(retrieved.len(), 1);
    }

    #[test]
    fn daily_stats_without_readings_is_none() {
        let store = Store::in_memory().unwrap();
        let result = store
            .update_daily_stats_for_date("2024-06-15", 10.0, "seoul", "household", &engine())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn hourly_usage_buckets_by_hour() {
        let mut store = Store::in_memory().unwrap();

        // 2024-06-15 00:00:00 UTC; two readings in hour 0, one in hour 3
        let base = 1_718_409_600i64;
        store
            .insert_readings(&[
                FlowReading::at("EP_1", base + 60, 30.0),
                FlowReading::at("EP_2", base + 120, 30.0),
                FlowReading::at("EP_1", base + 3 * 3600 + 5, 90.0),
            ])
            .unwrap();

        let hourly = store.get_hourly_usage("2024-06-15", 3600.0).unwrap();
        assert!((hourly[0] - 60.0).abs() < 1e-9);
        assert!((hourly[3] - 90.0).abs() < 1e-9);
        assert_eq!(hourly[12], 0.0);
    }

    #[test]
    fn monthly_and_yearly_usage_roll_up_daily_stats() {
        let store = Store::in_memory().unwrap();

        for (date, usage) in [
            ("2024-05-30", 100.0),
            ("2024-06-01", 200.0),
            ("2024-06-02", 50.0),
            ("2023-06-02", 75.0),
        ] {
            store
                .upsert_daily_stats(&DailyStats {
                    date: date.into(),
                    total_usage: usage,
                    total_cost: None,
                    avg_flow: 0.0,
                    max_flow: 0.0,
                    region: None,
                    usage_class: None,
                })
                .unwrap();
        }

        let monthly = store.get_monthly_usage(2024).unwrap();
        assert!((monthly[4] - 100.0).abs() < 1e-9);
        assert!((monthly[5] - 250.0).abs() < 1e-9);

        let yearly = store.get_yearly_usage().unwrap();
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].0, 2023);
        assert!((yearly[1].1 - 350.0).abs() < 1e-9);
    }

    #[test]
    fn cleanup_drops_old_readings() {
        let mut store = Store::in_memory().unwrap();
        let now = chrono::Utc::now().timestamp();

        store
            .insert_readings(&[
                FlowReading::at("EP_1", now - 100 * 86400, 10.0),
                FlowReading::at("EP_1", now, 10.0),
            ])
            .unwrap();

        let deleted = store.cleanup_old_readings(90).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.readings_count().unwrap(), 1);
    }

    #[test]
    fn groups_document_roundtrip() {
        let store = Store::in_memory().unwrap();

        // absent document reads as empty
        assert!(store.load_groups().unwrap().is_empty());

        let mut groups = GroupMap::new();
        groups.insert("building-a".into(), vec!["EP_1".into(), "EP_2".into()]);
        store.save_groups(&groups).unwrap();

        let loaded = store.load_groups().unwrap();
        assert_eq!(loaded, groups);

        // saving again overwrites the single record
        groups.insert("building-b".into(), vec!["EP_3".into()]);
        store.save_groups(&groups).unwrap();
        assert_eq!(store.load_groups().unwrap().len(), 2);
    }
}

use async_trait::async_trait;
use chrono::NaiveDateTime;
use eyre::Result;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, Row, Statement};
use tracing::{debug, error, info};

use common::types::{InputIndex, InputRecord, LogicalTime, NoticeRecord, RecordKind, ReportRecord};
use config::DatabaseConfig;

use crate::errors::StoreError;
use crate::RecordStore;

const INPUT_COLUMNS: &str =
    r#""index"::bigint AS index, msg_sender, tx_hash, block_number, timestamp, payload, time"#;
const OUTPUT_COLUMNS: &str =
    r#"input_index::bigint AS input_index, "index"::bigint AS index, payload, time"#;

/// Record store backed by the rollup node's Postgres database.
pub struct PostgresStore {
    client: Client,
    connection: JoinHandle<()>,
    statements: Statements,
    name: String,
}

struct Statements {
    latest_input_time: Statement,
    latest_notice_time: Statement,
    latest_report_time: Statement,
    first_notice_after: Statement,
    first_report_after: Statement,
    latest_input: Statement,
    input: Statement,
}

impl PostgresStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let name = config.to_string();

        let mut pg = tokio_postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(config.password.as_bytes())
            .dbname(&config.name)
            .application_name("rollup-bench");

        let (client, connection) = pg
            .connect(NoTls)
            .await
            .map_err(|err| StoreError::Connection(name.clone(), err))?;

        let connection = tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(target: "rollup_bench::store", error = %err, "postgres connection closed");
            }
        });

        let statements = Statements::prepare(&client).await?;
        info!(target: "rollup_bench::store", "connected to {}", name);

        Ok(PostgresStore {
            client,
            connection,
            statements,
            name,
        })
    }

    /// Closes the session and waits for the connection task to finish.
    pub async fn close(self) {
        drop(self.client);
        if let Err(err) = self.connection.await {
            error!(target: "rollup_bench::store", error = %err, "connection task failed");
        }
        debug!(target: "rollup_bench::store", "closed {}", self.name);
    }

    async fn query_opt(
        &self,
        kind: RecordKind,
        statement: &Statement,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Option<Row>> {
        let row = self
            .client
            .query_opt(statement, params)
            .await
            .map_err(|err| StoreError::Query(kind, err))?;
        Ok(row)
    }
}

impl Statements {
    async fn prepare(client: &Client) -> Result<Self> {
        let latest_input_sql = format!(
            "SELECT {INPUT_COLUMNS} FROM inputs WHERE time IS NOT NULL ORDER BY time DESC LIMIT 1"
        );
        let input_sql = format!(r#"SELECT {INPUT_COLUMNS} FROM inputs WHERE "index" = $1::bigint"#);

        Ok(Statements {
            latest_input_time: prepare(client, RecordKind::Input, &latest_time_sql(RecordKind::Input))
                .await?,
            latest_notice_time: prepare(
                client,
                RecordKind::Notice,
                &latest_time_sql(RecordKind::Notice),
            )
            .await?,
            latest_report_time: prepare(
                client,
                RecordKind::Report,
                &latest_time_sql(RecordKind::Report),
            )
            .await?,
            first_notice_after: prepare(
                client,
                RecordKind::Notice,
                &first_after_sql(RecordKind::Notice),
            )
            .await?,
            first_report_after: prepare(
                client,
                RecordKind::Report,
                &first_after_sql(RecordKind::Report),
            )
            .await?,
            latest_input: prepare(client, RecordKind::Input, &latest_input_sql).await?,
            input: prepare(client, RecordKind::Input, &input_sql).await?,
        })
    }

    fn latest_time(&self, kind: RecordKind) -> &Statement {
        match kind {
            RecordKind::Input => &self.latest_input_time,
            RecordKind::Notice => &self.latest_notice_time,
            RecordKind::Report => &self.latest_report_time,
        }
    }
}

async fn prepare(client: &Client, kind: RecordKind, sql: &str) -> Result<Statement> {
    let statement = client
        .prepare(sql)
        .await
        .map_err(|err| StoreError::Prepare(kind, err))?;
    Ok(statement)
}

fn latest_time_sql(kind: RecordKind) -> String {
    format!(
        "SELECT time FROM {} WHERE time IS NOT NULL ORDER BY time DESC LIMIT 1",
        kind.table()
    )
}

// ties on time resolve to the earliest input, then the earliest output of that input
fn first_after_sql(kind: RecordKind) -> String {
    format!(
        r#"SELECT {OUTPUT_COLUMNS} FROM {} WHERE time > $1 ORDER BY time ASC, input_index ASC, "index" ASC LIMIT 1"#,
        kind.table()
    )
}

fn decode_input(row: &Row) -> Result<InputRecord, tokio_postgres::Error> {
    Ok(InputRecord {
        index: row.try_get("index")?,
        msg_sender: row.try_get("msg_sender")?,
        tx_hash: row.try_get("tx_hash")?,
        block_number: row.try_get("block_number")?,
        timestamp: row.try_get::<_, NaiveDateTime>("timestamp")?,
        payload: row.try_get("payload")?,
        time: row.try_get("time")?,
    })
}

fn decode_notice(row: &Row) -> Result<NoticeRecord, tokio_postgres::Error> {
    Ok(NoticeRecord {
        input_index: row.try_get("input_index")?,
        index: row.try_get("index")?,
        payload: row.try_get("payload")?,
        time: row.try_get("time")?,
    })
}

fn decode_report(row: &Row) -> Result<ReportRecord, tokio_postgres::Error> {
    Ok(ReportRecord {
        input_index: row.try_get("input_index")?,
        index: row.try_get("index")?,
        payload: row.try_get("payload")?,
        time: row.try_get("time")?,
    })
}

#[async_trait]
impl RecordStore for PostgresStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn latest_time(&self, kind: RecordKind) -> Result<Option<LogicalTime>> {
        let row = self
            .query_opt(kind, self.statements.latest_time(kind), &[])
            .await?;

        match row {
            Some(row) => {
                let time = row
                    .try_get::<_, LogicalTime>("time")
                    .map_err(|err| StoreError::Decode(kind, err))?;
                Ok(Some(time))
            }
            None => Ok(None),
        }
    }

    async fn first_notice_after(&self, threshold: LogicalTime) -> Result<Option<NoticeRecord>> {
        let kind = RecordKind::Notice;
        let row = self
            .query_opt(kind, &self.statements.first_notice_after, &[&threshold])
            .await?;

        let notice = row
            .as_ref()
            .map(decode_notice)
            .transpose()
            .map_err(|err| StoreError::Decode(kind, err))?;
        Ok(notice)
    }

    async fn first_report_after(&self, threshold: LogicalTime) -> Result<Option<ReportRecord>> {
        let kind = RecordKind::Report;
        let row = self
            .query_opt(kind, &self.statements.first_report_after, &[&threshold])
            .await?;

        let report = row
            .as_ref()
            .map(decode_report)
            .transpose()
            .map_err(|err| StoreError::Decode(kind, err))?;
        Ok(report)
    }

    async fn latest_input(&self) -> Result<Option<InputRecord>> {
        let kind = RecordKind::Input;
        let row = self
            .query_opt(kind, &self.statements.latest_input, &[])
            .await?;

        let input = row
            .as_ref()
            .map(decode_input)
            .transpose()
            .map_err(|err| StoreError::Decode(kind, err))?;
        Ok(input)
    }

    async fn input(&self, index: InputIndex) -> Result<Option<InputRecord>> {
        let kind = RecordKind::Input;
        let row = self.query_opt(kind, &self.statements.input, &[&index]).await?;

        let input = row
            .as_ref()
            .map(decode_input)
            .transpose()
            .map_err(|err| StoreError::Decode(kind, err))?;
        Ok(input)
    }
}

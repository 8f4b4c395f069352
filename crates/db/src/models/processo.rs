use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbBackend, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::processo;

/// Sentinel analyst value meaning "no analyst constraint" in [`ClearFilter`].
pub const ANALYST_FILTER_ALL: &str = "Todos";

#[derive(Debug, Error)]
pub enum ProcessoError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("upsert was not confirmed by the backend")]
    WriteNotConfirmed,
    #[error("{0}")]
    Validation(String),
}

/// A case record as it travels over the wire. Maps onto the external
/// `processos` table, which keeps Portuguese column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processo {
    pub analyst: String,
    pub process_number: String,
    #[serde(default)]
    pub production_date: Option<NaiveDate>,
    pub process_value: f64,
    pub total_passwords: i32,
    pub executed_passwords: i32,
    pub unidentified_passwords: i32,
    pub execution_timestamp: DateTime<Utc>,
}

/// Conjunctive filter set for [`Processo::clear_filtered`]. Absent fields
/// impose no constraint; an empty filter matches every record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearFilter {
    #[serde(default)]
    pub analyst: Option<String>,
    #[serde(default)]
    pub competencia: Option<String>,
    #[serde(default)]
    pub execution_date_from: Option<NaiveDate>,
    #[serde(default)]
    pub execution_date_to: Option<NaiveDate>,
}

impl Processo {
    fn from_model(model: processo::Model) -> Self {
        Self {
            analyst: model.analista,
            process_number: model.processo,
            production_date: model.data_producao,
            process_value: model.valor_processo,
            total_passwords: model.total_senhas,
            executed_passwords: model.senhas_executadas,
            unidentified_passwords: model.senhas_nao_identificadas,
            execution_timestamp: model.data_execucao,
        }
    }

    /// Value-level validation beyond what deserialization already enforces.
    /// No invariant ties the three counters together; only non-negativity
    /// is checked.
    pub fn validate(&self) -> Result<(), ProcessoError> {
        for (field, value) in [
            ("totalPasswords", self.total_passwords),
            ("executedPasswords", self.executed_passwords),
            ("unidentifiedPasswords", self.unidentified_passwords),
        ] {
            if value < 0 {
                return Err(ProcessoError::Validation(format!(
                    "{field} must be a non-negative integer"
                )));
            }
        }
        Ok(())
    }

    /// Full-replace upsert keyed on the unique `processo` column. Every column
    /// of an existing row is overwritten; there is no partial merge.
    ///
    /// Success requires the backend to hand the stored row back: a write that
    /// cannot be re-read under its key is reported as
    /// [`ProcessoError::WriteNotConfirmed`] rather than silently accepted.
    pub async fn upsert<C: ConnectionTrait>(db: &C, data: &Processo) -> Result<Self, ProcessoError> {
        let active = processo::ActiveModel {
            analista: Set(data.analyst.clone()),
            processo: Set(data.process_number.clone()),
            data_producao: Set(data.production_date),
            valor_processo: Set(data.process_value),
            total_senhas: Set(data.total_passwords),
            senhas_executadas: Set(data.executed_passwords),
            senhas_nao_identificadas: Set(data.unidentified_passwords),
            data_execucao: Set(data.execution_timestamp),
            ..Default::default()
        };

        processo::Entity::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(processo::Column::Processo)
                    .update_columns([
                        processo::Column::Analista,
                        processo::Column::DataProducao,
                        processo::Column::ValorProcesso,
                        processo::Column::TotalSenhas,
                        processo::Column::SenhasExecutadas,
                        processo::Column::SenhasNaoIdentificadas,
                        processo::Column::DataExecucao,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await?;

        let Some(record) = processo::Entity::find()
            .filter(processo::Column::Processo.eq(data.process_number.clone()))
            .one(db)
            .await?
        else {
            tracing::warn!(processo = %data.process_number, "Upsert returned no row to confirm");
            return Err(ProcessoError::WriteNotConfirmed);
        };
        Ok(Self::from_model(record))
    }

    /// Every record, most recent execution first. No pagination and no cap;
    /// result size grows with the table.
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = processo::Entity::find()
            .order_by_desc(processo::Column::DataExecucao)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Deletes the current calendar month via the backend-side procedure,
    /// using the server's local clock to pick month and year.
    pub async fn clear_current_month<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
        let now = Local::now();
        call_limpar_mes_atual(db, now.month(), now.year()).await
    }

    /// Deletes every record matching `filter` and returns the count deleted.
    pub async fn clear_filtered<C: ConnectionTrait>(
        db: &C,
        filter: &ClearFilter,
    ) -> Result<u64, ProcessoError> {
        let condition = filter_condition(filter)?;
        let result = processo::Entity::delete_many()
            .filter(condition)
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

/// External contract: `limpar_mes_atual(mes, ano)` is a stored procedure owned
/// by the backend that removes the records of the given calendar month. Its
/// filtering logic lives in the database and is invoked by name only.
pub async fn call_limpar_mes_atual<C: ConnectionTrait>(
    db: &C,
    mes: u32,
    ano: i32,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => "SELECT limpar_mes_atual($1, $2)",
        _ => "SELECT limpar_mes_atual(?, ?)",
    };
    let stmt = Statement::from_sql_and_values(backend, sql, [(mes as i32).into(), ano.into()]);
    db.execute_raw(stmt).await?;
    Ok(())
}

fn filter_condition(filter: &ClearFilter) -> Result<Condition, ProcessoError> {
    let mut condition = Condition::all();

    if let Some(analyst) = filter.analyst.as_deref()
        && analyst != ANALYST_FILTER_ALL
    {
        condition = condition.add(processo::Column::Analista.eq(analyst));
    }

    if let Some(competencia) = filter.competencia.as_deref() {
        // Literal equality against day 01 of the month; records written with
        // any other day in `data_producao` never match.
        let first_day = parse_competencia(competencia)?;
        condition = condition.add(processo::Column::DataProducao.eq(first_day));
    }

    if let Some(from) = filter.execution_date_from {
        let lower = from.and_time(NaiveTime::MIN).and_utc();
        condition = condition.add(processo::Column::DataExecucao.gte(lower));
    }

    if let Some(to) = filter.execution_date_to
        && let Some(upper) = to.and_hms_opt(23, 59, 59)
    {
        // End-of-day keeps the upper bound calendar-day inclusive.
        condition = condition.add(processo::Column::DataExecucao.lte(upper.and_utc()));
    }

    Ok(condition)
}

/// Parses a "MM/YYYY" competencia label into the first day of that month.
pub fn parse_competencia(raw: &str) -> Result<NaiveDate, ProcessoError> {
    let invalid = || {
        ProcessoError::Validation(format!("invalid competencia '{raw}', expected \"MM/YYYY\""))
    };
    let (month, year) = raw.split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "processos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub analista: String,
    #[sea_orm(unique)]
    pub processo: String,
    pub data_producao: Option<Date>,
    pub valor_processo: f64,
    pub total_senhas: i32,
    pub senhas_executadas: i32,
    pub senhas_nao_identificadas: i32,
    pub data_execucao: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

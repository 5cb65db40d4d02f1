use sqlx::PgConnection;

/// A handle to an active database connection, either pooled or part of a transaction
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to the external systems the domain's driven ports talk to
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// Something that can start a database transaction, producing a version of itself whose
/// connections all participate in that transaction
pub trait Transactable {
    type Handle: ExternalConnectivity + TransactionHandle;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

/// Connectivity with an open transaction that must be committed for its writes to persist
pub trait TransactionHandle {
    async fn commit(self) -> Result<(), anyhow::Error>;
}

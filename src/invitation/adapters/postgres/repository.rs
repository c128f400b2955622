//! `PostgreSQL` repository implementation for invitation storage.

use super::{
    models::{InvitationChangeset, InvitationRow, NewInvitationRow},
    schema::invitations,
};
use crate::invitation::{
    domain::{
        Invitation, InvitationCode, InvitationEmail, InvitationStatus, PersistedInvitationData,
        ReferrerId,
    },
    ports::{InvitationRepository, InvitationRepositoryError, InvitationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::{Map, Value};

/// `PostgreSQL` connection pool type used by invitation adapters.
pub type InvitationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed invitation repository.
#[derive(Debug, Clone)]
pub struct PostgresInvitationRepository {
    pool: InvitationPgPool,
}

impl PostgresInvitationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: InvitationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> InvitationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> InvitationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(InvitationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(InvitationRepositoryError::persistence)?
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let code = invitation.code().clone();
        let new_row = to_new_row(invitation)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(invitations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        InvitationRepositoryError::DuplicateCode(code.clone())
                    }
                    _ => InvitationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let code = invitation.code().clone();
        let changeset = to_changeset(invitation)?;
        let expected = invitation.revision().saturating_sub(1);
        let expected_column =
            i64::try_from(expected).map_err(InvitationRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                invitations::table
                    .filter(invitations::code.eq(code.as_str()))
                    .filter(invitations::revision.eq(expected_column)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(InvitationRepositoryError::persistence)?;

            if updated == 1 {
                return Ok(());
            }

            let stored_revision = invitations::table
                .filter(invitations::code.eq(code.as_str()))
                .select(invitations::revision)
                .first::<i64>(connection)
                .optional()
                .map_err(InvitationRepositoryError::persistence)?;

            match stored_revision {
                None => Err(InvitationRepositoryError::NotFound(code.clone())),
                Some(found) => Err(InvitationRepositoryError::StaleRevision {
                    code: code.clone(),
                    expected,
                    found: u64::try_from(found).map_err(InvitationRepositoryError::persistence)?,
                }),
            }
        })
        .await
    }

    async fn find_by_code(
        &self,
        code: &InvitationCode,
    ) -> InvitationRepositoryResult<Option<Invitation>> {
        let lookup_code = code.clone();
        self.run_blocking(move |connection| {
            let row = invitations::table
                .filter(invitations::code.eq(lookup_code.as_str()))
                .select(InvitationRow::as_select())
                .first::<InvitationRow>(connection)
                .optional()
                .map_err(InvitationRepositoryError::persistence)?;
            row.map(row_to_invitation).transpose()
        })
        .await
    }
}

fn to_new_row(invitation: &Invitation) -> InvitationRepositoryResult<NewInvitationRow> {
    Ok(NewInvitationRow {
        code: invitation.code().as_str().to_owned(),
        email: invitation.email().as_str().to_owned(),
        referrer_id: invitation.referrer_id().value(),
        valid_until: invitation.valid_until(),
        status: invitation.status().as_str().to_owned(),
        allow_multiple_use: invitation.allow_multiple_use(),
        use_count: i32::try_from(invitation.use_count())
            .map_err(InvitationRepositoryError::persistence)?,
        attributes: Value::Object(invitation.attributes().clone()),
        revision: i64::try_from(invitation.revision())
            .map_err(InvitationRepositoryError::persistence)?,
        created_at: invitation.created_at(),
        updated_at: invitation.updated_at(),
    })
}

fn to_changeset(invitation: &Invitation) -> InvitationRepositoryResult<InvitationChangeset> {
    Ok(InvitationChangeset {
        status: invitation.status().as_str().to_owned(),
        use_count: i32::try_from(invitation.use_count())
            .map_err(InvitationRepositoryError::persistence)?,
        attributes: Value::Object(invitation.attributes().clone()),
        revision: i64::try_from(invitation.revision())
            .map_err(InvitationRepositoryError::persistence)?,
        updated_at: invitation.updated_at(),
    })
}

fn row_to_invitation(row: InvitationRow) -> InvitationRepositoryResult<Invitation> {
    let InvitationRow {
        code,
        email,
        referrer_id,
        valid_until,
        status: persisted_status,
        allow_multiple_use,
        use_count,
        attributes: persisted_attributes,
        revision,
        created_at,
        updated_at,
    } = row;

    let status = InvitationStatus::try_from(persisted_status.as_str())
        .map_err(InvitationRepositoryError::persistence)?;
    let attributes = serde_json::from_value::<Map<String, Value>>(persisted_attributes)
        .map_err(InvitationRepositoryError::persistence)?;

    let data = PersistedInvitationData {
        code: InvitationCode::new(code).map_err(InvitationRepositoryError::persistence)?,
        email: InvitationEmail::new(email).map_err(InvitationRepositoryError::persistence)?,
        referrer_id: ReferrerId::new(referrer_id)
            .map_err(InvitationRepositoryError::persistence)?,
        valid_until,
        status,
        allow_multiple_use,
        use_count: u32::try_from(use_count).map_err(InvitationRepositoryError::persistence)?,
        attributes,
        revision: u64::try_from(revision).map_err(InvitationRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Invitation::from_persisted(data))
}

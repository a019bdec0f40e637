//! Database repository for CRUD and lifecycle operations.
//!
//! Uses prepared statements and transactions for data integrity. State
//! transitions are single conditional UPDATEs keyed on the current status, so
//! a losing concurrent writer observes Conflict instead of overwriting.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};

use crate::auth::ShelterGuard;
use crate::errors::AppError;
use crate::models::{
    AdoptionRequest, AdoptionStatus, BookingStatus, Campaign, CampaignParticipant, CampaignStatus,
    CreateBookingRequest, CreateCampaignRequest, CreateInviteRequest, CreatePetRequest,
    CreateShelterRequest, DonateRequest, InviteStatus, InviteValidation, Page, Pet, PetSize,
    PetStatus, RegisterRequest, Shelter, ShelterInvite, ShelterMember, ShelterMemberView,
    ShelterRole, ShelterStatus, SubmitAdoptionRequest, UpdatePetRequest, UpdateShelterRequest,
    User, UserRole, VetBooking,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER & SESSION OPERATIONS ====================

    /// Create a new user account.
    pub async fn create_user(
        &self,
        request: &RegisterRequest,
        password_hash: Option<String>,
    ) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let email = request.email.trim().to_lowercase();

        let result = sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, avatar_url, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 'user', ?, ?)"
        )
        .bind(&id)
        .bind(&email)
        .bind(&request.name)
        .bind(&password_hash)
        .bind(&request.avatar_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    email
                )));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(User {
            id,
            email,
            name: request.name.clone(),
            avatar_url: request.avatar_url.clone(),
            role: UserRole::User,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, avatar_url, role, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Look up a user by email together with the stored password hash.
    pub async fn find_user_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, Option<String>)>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, avatar_url, role, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(|r| {
            let hash: Option<String> = r.get("password_hash");
            (user_from_row(r), hash)
        }))
    }

    /// Change a user's platform role.
    pub async fn set_user_role(&self, id: &str, role: UserRole) -> Result<User, AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Store a session for a user. Only the token hash is persisted.
    pub async fn create_session(
        &self,
        user_id: &str,
        token_hash: &str,
        ttl_minutes: i64,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let expires_at = (now + Duration::minutes(ttl_minutes)).to_rfc3339();

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(&expires_at)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a session (logout). Unknown tokens are a no-op.
    pub async fn delete_session(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Resolve a session token hash to its user, if the session is live.
    pub async fn session_user(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r#"SELECT u.id, u.email, u.name, u.avatar_url, u.role, u.created_at, u.updated_at
               FROM sessions s JOIN users u ON u.id = s.user_id
               WHERE s.token_hash = ? AND s.expires_at > ?"#,
        )
        .bind(token_hash)
        .bind(&now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    // ==================== SHELTER OPERATIONS ====================

    /// Create a shelter application; the applicant becomes its owner.
    pub async fn create_shelter(
        &self,
        request: &CreateShelterRequest,
        owner_id: &str,
    ) -> Result<Shelter, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO shelters (id, name, contact_email, contact_phone, city, description, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 'pending_review', ?, ?)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.contact_email)
        .bind(&request.contact_phone)
        .bind(&request.city)
        .bind(&request.description)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO shelter_members (shelter_id, user_id, role, joined_at) VALUES (?, ?, 'owner', ?)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Shelter {
            id,
            name: request.name.clone(),
            contact_email: request.contact_email.clone(),
            contact_phone: request.contact_phone.clone(),
            city: request.city.clone(),
            description: request.description.clone(),
            status: ShelterStatus::PendingReview,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a shelter by ID.
    pub async fn get_shelter(&self, id: &str) -> Result<Option<Shelter>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, contact_email, contact_phone, city, description, status, created_at, updated_at FROM shelters WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(shelter_from_row))
    }

    /// List shelters, optionally filtered by status.
    pub async fn list_shelters(
        &self,
        status: Option<ShelterStatus>,
    ) -> Result<Vec<Shelter>, AppError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT id, name, contact_email, contact_phone, city, description, status, created_at, updated_at FROM shelters WHERE status = ? ORDER BY name",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, name, contact_email, contact_phone, city, description, status, created_at, updated_at FROM shelters ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(shelter_from_row).collect())
    }

    /// Update a shelter profile.
    pub async fn update_shelter(
        &self,
        id: &str,
        request: &UpdateShelterRequest,
    ) -> Result<Shelter, AppError> {
        let existing = self
            .get_shelter(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shelter {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let name = request.name.as_ref().unwrap_or(&existing.name);
        let contact_email = request
            .contact_email
            .as_ref()
            .unwrap_or(&existing.contact_email);
        let contact_phone = request
            .contact_phone
            .clone()
            .or(existing.contact_phone.clone());
        let city = request.city.clone().or(existing.city.clone());
        let description = request.description.clone().or(existing.description.clone());

        sqlx::query(
            "UPDATE shelters SET name = ?, contact_email = ?, contact_phone = ?, city = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(contact_email)
        .bind(&contact_phone)
        .bind(&city)
        .bind(&description)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Shelter {
            id: id.to_string(),
            name: name.clone(),
            contact_email: contact_email.clone(),
            contact_phone,
            city,
            description,
            status: existing.status,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Set a shelter's moderation status (admin operation).
    pub async fn set_shelter_status(
        &self,
        id: &str,
        status: ShelterStatus,
    ) -> Result<Shelter, AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE shelters SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Shelter {} not found", id)));
        }

        self.get_shelter(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shelter {} not found", id)))
    }

    /// Membership entries of a shelter.
    pub async fn shelter_members(&self, shelter_id: &str) -> Result<Vec<ShelterMember>, AppError> {
        let rows = sqlx::query(
            "SELECT user_id, role, joined_at FROM shelter_members WHERE shelter_id = ? ORDER BY joined_at",
        )
        .bind(shelter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Membership entries joined with account details, for listings.
    pub async fn list_shelter_members(
        &self,
        shelter_id: &str,
    ) -> Result<Vec<ShelterMemberView>, AppError> {
        let rows = sqlx::query(
            r#"SELECT m.user_id, u.name, u.email, m.role, m.joined_at
               FROM shelter_members m JOIN users u ON u.id = m.user_id
               WHERE m.shelter_id = ? ORDER BY m.joined_at"#,
        )
        .bind(shelter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_view_from_row).collect())
    }

    /// Role of a user within a shelter, if any.
    pub async fn membership_role(
        &self,
        shelter_id: &str,
        user_id: &str,
    ) -> Result<Option<ShelterRole>, AppError> {
        let row =
            sqlx::query("SELECT role FROM shelter_members WHERE shelter_id = ? AND user_id = ?")
                .bind(shelter_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|r| {
            let role: String = r.get("role");
            ShelterRole::parse(&role)
        }))
    }

    /// Remove a member from a shelter.
    pub async fn remove_shelter_member(
        &self,
        shelter_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM shelter_members WHERE shelter_id = ? AND user_id = ?")
                .bind(shelter_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "User {} is not a member of shelter {}",
                user_id, shelter_id
            )));
        }

        Ok(())
    }

    /// Load a shelter and its membership list as a capability object gating
    /// shelter-scoped operations on the given roles.
    pub async fn shelter_guard(
        &self,
        shelter_id: &str,
        allowed: &[ShelterRole],
    ) -> Result<ShelterGuard, AppError> {
        let shelter = self
            .get_shelter(shelter_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shelter {} not found", shelter_id)))?;
        let members = self.shelter_members(shelter_id).await?;

        Ok(ShelterGuard::new(shelter, members, allowed))
    }

    // ==================== INVITE OPERATIONS ====================

    /// Create a shelter invite, revoking any prior pending invite for the
    /// same (shelter, email) pair in the same transaction.
    pub async fn create_invite(
        &self,
        shelter_id: &str,
        request: &CreateInviteRequest,
        role: ShelterRole,
        token_hash: &str,
        ttl_minutes: i64,
        invited_by: &str,
    ) -> Result<ShelterInvite, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_str = now.to_rfc3339();
        let expires_at = (now + Duration::minutes(ttl_minutes)).to_rfc3339();
        let email = request.email.trim().to_lowercase();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE shelter_invites SET status = 'revoked', updated_at = ? WHERE shelter_id = ? AND email = ? AND status = 'pending'",
        )
        .bind(&now_str)
        .bind(shelter_id)
        .bind(&email)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO shelter_invites (id, shelter_id, email, role, token_hash, status, invited_by, expires_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(shelter_id)
        .bind(&email)
        .bind(role.as_str())
        .bind(token_hash)
        .bind(invited_by)
        .bind(&expires_at)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ShelterInvite {
            id,
            shelter_id: shelter_id.to_string(),
            email,
            role,
            status: InviteStatus::Pending,
            invited_by: invited_by.to_string(),
            expires_at,
            created_at: now_str.clone(),
            updated_at: now_str,
        })
    }

    /// Get an invite by ID.
    pub async fn get_invite(&self, id: &str) -> Result<Option<ShelterInvite>, AppError> {
        let row = sqlx::query(
            "SELECT id, shelter_id, email, role, status, invited_by, expires_at, created_at, updated_at FROM shelter_invites WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(invite_from_row))
    }

    /// List all invites of a shelter, newest first.
    pub async fn list_shelter_invites(
        &self,
        shelter_id: &str,
    ) -> Result<Vec<ShelterInvite>, AppError> {
        let rows = sqlx::query(
            "SELECT id, shelter_id, email, role, status, invited_by, expires_at, created_at, updated_at FROM shelter_invites WHERE shelter_id = ? ORDER BY created_at DESC",
        )
        .bind(shelter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(invite_from_row).collect())
    }

    /// Probe an invite token. Looks up by one-way hash only; a pending invite
    /// past its expiry is lazily flipped to expired here.
    pub async fn validate_invite(&self, token_hash: &str) -> Result<InviteValidation, AppError> {
        let row = sqlx::query(
            "SELECT id, shelter_id, email, role, status, invited_by, expires_at, created_at, updated_at FROM shelter_invites WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        let Some(invite) = row.as_ref().map(invite_from_row) else {
            return Ok(InviteValidation::invalid("invalid"));
        };

        match invite.status {
            InviteStatus::Accepted => return Ok(InviteValidation::invalid("accepted")),
            InviteStatus::Revoked => return Ok(InviteValidation::invalid("revoked")),
            InviteStatus::Expired => return Ok(InviteValidation::invalid("expired")),
            InviteStatus::Pending => {}
        }

        if is_past(&invite.expires_at) {
            self.mark_invite_expired(&invite.id).await?;
            return Ok(InviteValidation::invalid("expired"));
        }

        let shelter_name = self
            .get_shelter(&invite.shelter_id)
            .await?
            .map(|s| s.name);

        Ok(InviteValidation {
            valid: true,
            reason: None,
            shelter_id: Some(invite.shelter_id),
            shelter_name,
            role: Some(invite.role),
            email: Some(invite.email),
        })
    }

    /// Accept an invite: consume it exactly once and upsert the membership,
    /// in a single transaction.
    pub async fn accept_invite(
        &self,
        token_hash: &str,
        user_id: &str,
    ) -> Result<ShelterInvite, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, shelter_id, email, role, status, invited_by, expires_at, created_at, updated_at FROM shelter_invites WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let invite = row
            .as_ref()
            .map(invite_from_row)
            .ok_or_else(|| AppError::NotFound("Invite not found".to_string()))?;

        match invite.status {
            InviteStatus::Pending => {}
            other => {
                return Err(AppError::Conflict(format!(
                    "Invite is already {}",
                    other.as_str()
                )));
            }
        }

        let now = Utc::now().to_rfc3339();

        if is_past(&invite.expires_at) {
            sqlx::query(
                "UPDATE shelter_invites SET status = 'expired', updated_at = ? WHERE id = ? AND status = 'pending'",
            )
            .bind(&now)
            .bind(&invite.id)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            return Err(AppError::Conflict("Invite has expired".to_string()));
        }

        // Conditional update: a concurrent acceptance loses here.
        let result = sqlx::query(
            "UPDATE shelter_invites SET status = 'accepted', updated_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(&invite.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Invite was already consumed".to_string(),
            ));
        }

        sqlx::query(
            r#"INSERT INTO shelter_members (shelter_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)
               ON CONFLICT(shelter_id, user_id) DO UPDATE SET role = excluded.role"#,
        )
        .bind(&invite.shelter_id)
        .bind(user_id)
        .bind(invite.role.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ShelterInvite {
            status: InviteStatus::Accepted,
            updated_at: now,
            ..invite
        })
    }

    /// Revoke a pending invite.
    pub async fn revoke_invite(&self, id: &str) -> Result<ShelterInvite, AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE shelter_invites SET status = 'revoked', updated_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_invite(id).await? {
                None => Err(AppError::NotFound(format!("Invite {} not found", id))),
                Some(invite) => Err(AppError::Conflict(format!(
                    "Invite is already {}",
                    invite.status.as_str()
                ))),
            };
        }

        self.get_invite(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invite {} not found", id)))
    }

    /// Record a resend of a pending, unexpired invite. The token is not
    /// rotated; only the hash is stored, so there is nothing to re-issue.
    pub async fn touch_invite_resend(&self, id: &str) -> Result<ShelterInvite, AppError> {
        let invite = self
            .get_invite(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invite {} not found", id)))?;

        if invite.status != InviteStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Invite is already {}",
                invite.status.as_str()
            )));
        }
        if is_past(&invite.expires_at) {
            return Err(AppError::Conflict("Invite has expired".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE shelter_invites SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(ShelterInvite {
            updated_at: now,
            ..invite
        })
    }

    async fn mark_invite_expired(&self, id: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE shelter_invites SET status = 'expired', updated_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ==================== PET OPERATIONS ====================

    /// Create a pet listing.
    pub async fn create_pet(&self, request: &CreatePetRequest) -> Result<Pet, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let photos_json = serde_json::to_string(&request.photo_urls).unwrap_or_default();
        let size_str = request.size.map(|s| s.as_str().to_string());

        sqlx::query(
            r#"INSERT INTO pets (
                id, shelter_id, name, species, breed, age_months, size,
                vaccinated, spayed, photo_urls, description, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'available', ?, ?)"#,
        )
        .bind(&id)
        .bind(&request.shelter_id)
        .bind(&request.name)
        .bind(&request.species)
        .bind(&request.breed)
        .bind(request.age_months)
        .bind(&size_str)
        .bind(request.vaccinated as i32)
        .bind(request.spayed as i32)
        .bind(&photos_json)
        .bind(&request.description)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Pet {
            id,
            shelter_id: request.shelter_id.clone(),
            name: request.name.clone(),
            species: request.species.clone(),
            breed: request.breed.clone(),
            age_months: request.age_months,
            size: request.size,
            vaccinated: request.vaccinated,
            spayed: request.spayed,
            photo_urls: request.photo_urls.clone(),
            description: request.description.clone(),
            status: PetStatus::Available,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a pet by ID.
    pub async fn get_pet(&self, id: &str) -> Result<Option<Pet>, AppError> {
        let row = sqlx::query(
            "SELECT id, shelter_id, name, species, breed, age_months, size, vaccinated, spayed, photo_urls, description, status, created_at, updated_at FROM pets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(pet_from_row))
    }

    /// List pets with optional filters and pagination.
    pub async fn list_pets(
        &self,
        status: Option<PetStatus>,
        species: Option<&str>,
        q: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Pet>, AppError> {
        let mut where_sql = String::from(" WHERE 1=1");
        if status.is_some() {
            where_sql.push_str(" AND status = ?");
        }
        if species.is_some() {
            where_sql.push_str(" AND species = ?");
        }
        if q.is_some() {
            where_sql.push_str(" AND (name LIKE ? OR breed LIKE ? OR description LIKE ?)");
        }

        let count_sql = format!("SELECT COUNT(*) AS n FROM pets{}", where_sql);
        let list_sql = format!(
            "SELECT id, shelter_id, name, species, breed, age_months, size, vaccinated, spayed, photo_urls, description, status, created_at, updated_at FROM pets{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            where_sql
        );
        let pattern = q.map(|q| format!("%{}%", q));

        let mut count_query = sqlx::query(&count_sql);
        if let Some(status) = status {
            count_query = count_query.bind(status.as_str());
        }
        if let Some(species) = species {
            count_query = count_query.bind(species);
        }
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern).bind(pattern).bind(pattern);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.get("n");

        let mut list_query = sqlx::query(&list_sql);
        if let Some(status) = status {
            list_query = list_query.bind(status.as_str());
        }
        if let Some(species) = species {
            list_query = list_query.bind(species);
        }
        if let Some(pattern) = &pattern {
            list_query = list_query.bind(pattern).bind(pattern).bind(pattern);
        }
        let rows = list_query
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items: rows.iter().map(pet_from_row).collect(),
            total,
            page,
            page_size,
        })
    }

    /// Update a pet listing.
    pub async fn update_pet(&self, id: &str, request: &UpdatePetRequest) -> Result<Pet, AppError> {
        let existing = self
            .get_pet(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let name = request.name.as_ref().unwrap_or(&existing.name);
        let species = request.species.as_ref().unwrap_or(&existing.species);
        let breed = request.breed.clone().or(existing.breed.clone());
        let age_months = request.age_months.or(existing.age_months);
        let size = request.size.or(existing.size);
        let vaccinated = request.vaccinated.unwrap_or(existing.vaccinated);
        let spayed = request.spayed.unwrap_or(existing.spayed);
        let photo_urls = request
            .photo_urls
            .clone()
            .unwrap_or(existing.photo_urls.clone());
        let description = request.description.clone().or(existing.description.clone());
        let status = request.status.unwrap_or(existing.status);

        let photos_json = serde_json::to_string(&photo_urls).unwrap_or_default();
        let size_str = size.map(|s| s.as_str().to_string());

        sqlx::query(
            r#"UPDATE pets SET
                name = ?, species = ?, breed = ?, age_months = ?, size = ?,
                vaccinated = ?, spayed = ?, photo_urls = ?, description = ?,
                status = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(name)
        .bind(species)
        .bind(&breed)
        .bind(age_months)
        .bind(&size_str)
        .bind(vaccinated as i32)
        .bind(spayed as i32)
        .bind(&photos_json)
        .bind(&description)
        .bind(status.as_str())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Pet {
            id: id.to_string(),
            shelter_id: existing.shelter_id,
            name: name.clone(),
            species: species.clone(),
            breed,
            age_months,
            size,
            vaccinated,
            spayed,
            photo_urls,
            description,
            status,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a pet listing.
    pub async fn delete_pet(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Pet {} not found", id)));
        }

        Ok(())
    }

    // ==================== ADOPTION REQUEST OPERATIONS ====================

    /// Submit an adoption request for a pet. Fails with NotFound if the pet
    /// does not exist; no row is created in that case.
    pub async fn submit_adoption(
        &self,
        request: &SubmitAdoptionRequest,
    ) -> Result<AdoptionRequest, AppError> {
        let pet = self
            .get_pet(&request.pet_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", request.pet_id)))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO adoption_requests (
                id, pet_id, shelter_id, full_name, email, phone, household,
                message, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)"#,
        )
        .bind(&id)
        .bind(&request.pet_id)
        .bind(&pet.shelter_id)
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.household)
        .bind(&request.message)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(AdoptionRequest {
            id,
            pet_id: request.pet_id.clone(),
            shelter_id: pet.shelter_id,
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            household: request.household.clone(),
            message: request.message.clone(),
            status: AdoptionStatus::Pending,
            decision_notes: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get an adoption request by ID.
    pub async fn get_adoption(&self, id: &str) -> Result<Option<AdoptionRequest>, AppError> {
        let row = sqlx::query(
            "SELECT id, pet_id, shelter_id, full_name, email, phone, household, message, status, decision_notes, created_at, updated_at FROM adoption_requests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(adoption_from_row))
    }

    /// List adoption requests with optional filters and pagination.
    pub async fn list_adoptions(
        &self,
        shelter_id: Option<&str>,
        status: Option<AdoptionStatus>,
        pet_id: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<AdoptionRequest>, AppError> {
        let mut where_sql = String::from(" WHERE 1=1");
        if shelter_id.is_some() {
            where_sql.push_str(" AND shelter_id = ?");
        }
        if status.is_some() {
            where_sql.push_str(" AND status = ?");
        }
        if pet_id.is_some() {
            where_sql.push_str(" AND pet_id = ?");
        }

        let count_sql = format!("SELECT COUNT(*) AS n FROM adoption_requests{}", where_sql);
        let list_sql = format!(
            "SELECT id, pet_id, shelter_id, full_name, email, phone, household, message, status, decision_notes, created_at, updated_at FROM adoption_requests{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            where_sql
        );

        let mut count_query = sqlx::query(&count_sql);
        if let Some(shelter_id) = shelter_id {
            count_query = count_query.bind(shelter_id);
        }
        if let Some(status) = status {
            count_query = count_query.bind(status.as_str());
        }
        if let Some(pet_id) = pet_id {
            count_query = count_query.bind(pet_id);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.get("n");

        let mut list_query = sqlx::query(&list_sql);
        if let Some(shelter_id) = shelter_id {
            list_query = list_query.bind(shelter_id);
        }
        if let Some(status) = status {
            list_query = list_query.bind(status.as_str());
        }
        if let Some(pet_id) = pet_id {
            list_query = list_query.bind(pet_id);
        }
        let rows = list_query
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items: rows.iter().map(adoption_from_row).collect(),
            total,
            page,
            page_size,
        })
    }

    /// All adoption requests, for search index rebuilds.
    pub async fn list_all_adoptions(&self) -> Result<Vec<AdoptionRequest>, AppError> {
        let rows = sqlx::query(
            "SELECT id, pet_id, shelter_id, full_name, email, phone, household, message, status, decision_notes, created_at, updated_at FROM adoption_requests ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(adoption_from_row).collect())
    }

    /// Adoption requests by ID, preserving the input order. Missing ids are
    /// skipped.
    pub async fn get_adoptions_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<AdoptionRequest>, AppError> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(request) = self.get_adoption(id).await? {
                results.push(request);
            }
        }
        Ok(results)
    }

    /// Move an adoption request to a new status. Only forward transitions are
    /// legal; the update is conditional on the status the caller read, so a
    /// concurrent transition results in Conflict rather than a lost update.
    pub async fn transition_adoption(
        &self,
        id: &str,
        new_status: AdoptionStatus,
        notes: Option<&str>,
    ) -> Result<AdoptionRequest, AppError> {
        let existing = self
            .get_adoption(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Adoption request {} not found", id)))?;

        if !existing.status.can_transition_to(new_status) {
            return Err(AppError::Validation(format!(
                "Cannot transition adoption request from {} to {}",
                existing.status.as_str(),
                new_status.as_str()
            )));
        }

        let now = Utc::now().to_rfc3339();
        let notes = notes
            .map(|n| n.to_string())
            .or(existing.decision_notes.clone());

        let result = sqlx::query(
            "UPDATE adoption_requests SET status = ?, decision_notes = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(new_status.as_str())
        .bind(&notes)
        .bind(&now)
        .bind(id)
        .bind(existing.status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Concurrent modification detected".to_string(),
            ));
        }

        Ok(AdoptionRequest {
            status: new_status,
            decision_notes: notes,
            updated_at: now,
            ..existing
        })
    }

    /// Withdraw an adoption request. Irreversible.
    pub async fn delete_adoption(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM adoption_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Adoption request {} not found",
                id
            )));
        }

        Ok(())
    }

    // ==================== CAMPAIGN OPERATIONS ====================

    /// Start a fundraising campaign for a pet.
    pub async fn create_campaign(
        &self,
        request: &CreateCampaignRequest,
    ) -> Result<Campaign, AppError> {
        self.get_pet(&request.pet_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet {} not found", request.pet_id)))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO campaigns (id, pet_id, title, description, goal_cents, raised_cents, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, 'active', ?, ?)"
        )
        .bind(&id)
        .bind(&request.pet_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.goal_cents)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Campaign {
            id,
            pet_id: request.pet_id.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            goal_cents: request.goal_cents,
            raised_cents: 0,
            status: CampaignStatus::Active,
            participants: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a campaign with its participants.
    pub async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, AppError> {
        let row = sqlx::query(
            "SELECT id, pet_id, title, description, goal_cents, raised_cents, status, created_at, updated_at FROM campaigns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let participants = self.campaign_participants(id).await?;
        Ok(Some(campaign_from_row(&row, participants)))
    }

    /// List campaigns, optionally filtered by status.
    pub async fn list_campaigns(
        &self,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<Campaign>, AppError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT id, pet_id, title, description, goal_cents, raised_cents, status, created_at, updated_at FROM campaigns WHERE status = ? ORDER BY created_at DESC",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, pet_id, title, description, goal_cents, raised_cents, status, created_at, updated_at FROM campaigns ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut campaigns = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let participants = self.campaign_participants(&id).await?;
            campaigns.push(campaign_from_row(row, participants));
        }

        Ok(campaigns)
    }

    /// Record a donation: participant insert and raised-total increment in
    /// one transaction, so the two cannot drift apart.
    pub async fn donate(
        &self,
        campaign_id: &str,
        request: &DonateRequest,
    ) -> Result<Campaign, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT status FROM campaigns WHERE id = ?")
            .bind(campaign_id)
            .fetch_optional(&mut *tx)
            .await?;

        let status: String = row
            .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", campaign_id)))?
            .get("status");
        if CampaignStatus::parse(&status) != Some(CampaignStatus::Active) {
            return Err(AppError::Conflict("Campaign is not active".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO campaign_participants (id, campaign_id, name, email, amount_cents, donated_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(campaign_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.amount_cents)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE campaigns SET raised_cents = raised_cents + ?, updated_at = ? WHERE id = ?",
        )
        .bind(request.amount_cents)
        .bind(&now)
        .bind(campaign_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_campaign(campaign_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", campaign_id)))
    }

    /// Close or cancel a campaign.
    pub async fn set_campaign_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<Campaign, AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE campaigns SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Campaign {} not found", id)));
        }

        self.get_campaign(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", id)))
    }

    async fn campaign_participants(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<CampaignParticipant>, AppError> {
        let rows = sqlx::query(
            "SELECT name, email, amount_cents, donated_at FROM campaign_participants WHERE campaign_id = ? ORDER BY donated_at",
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(participant_from_row).collect())
    }

    // ==================== BOOKING OPERATIONS ====================

    /// Book a vet slot. The partial unique index on (vet, slot) makes this
    /// the mutual exclusion point: the losing concurrent insert gets Conflict.
    pub async fn create_booking(
        &self,
        user_id: &str,
        request: &CreateBookingRequest,
    ) -> Result<VetBooking, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO vet_bookings (id, vet_name, slot_at, user_id, pet_id, status, created_at) VALUES (?, ?, ?, ?, ?, 'booked', ?)"
        )
        .bind(&id)
        .bind(&request.vet_name)
        .bind(&request.slot_at)
        .bind(user_id)
        .bind(&request.pet_id)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AppError::Conflict(format!(
                    "Slot {} with {} is already booked",
                    request.slot_at, request.vet_name
                )));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(VetBooking {
            id,
            vet_name: request.vet_name.clone(),
            slot_at: request.slot_at.clone(),
            user_id: user_id.to_string(),
            pet_id: request.pet_id.clone(),
            status: BookingStatus::Booked,
            created_at: now,
        })
    }

    /// Get a booking by ID.
    pub async fn get_booking(&self, id: &str) -> Result<Option<VetBooking>, AppError> {
        let row = sqlx::query(
            "SELECT id, vet_name, slot_at, user_id, pet_id, status, created_at FROM vet_bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(booking_from_row))
    }

    /// List a user's bookings.
    pub async fn list_user_bookings(&self, user_id: &str) -> Result<Vec<VetBooking>, AppError> {
        let rows = sqlx::query(
            "SELECT id, vet_name, slot_at, user_id, pet_id, status, created_at FROM vet_bookings WHERE user_id = ? ORDER BY slot_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    /// Cancel an active booking, freeing its slot.
    pub async fn cancel_booking(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE vet_bookings SET status = 'cancelled' WHERE id = ? AND status = 'booked'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_booking(id).await? {
                None => Err(AppError::NotFound(format!("Booking {} not found", id))),
                Some(_) => Err(AppError::Conflict(
                    "Booking is already cancelled".to_string(),
                )),
            };
        }

        Ok(())
    }
}

/// Whether an RFC 3339 timestamp is in the past. Unparseable values count as
/// past, which fails closed for expiry checks.
fn is_past(timestamp: &str) -> bool {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t <= Utc::now())
        .unwrap_or(true)
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        role: UserRole::parse(&role).unwrap_or(UserRole::User),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn shelter_from_row(row: &sqlx::sqlite::SqliteRow) -> Shelter {
    let status: String = row.get("status");
    Shelter {
        id: row.get("id"),
        name: row.get("name"),
        contact_email: row.get("contact_email"),
        contact_phone: row.get("contact_phone"),
        city: row.get("city"),
        description: row.get("description"),
        status: ShelterStatus::parse(&status).unwrap_or(ShelterStatus::PendingReview),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> ShelterMember {
    let role: String = row.get("role");
    ShelterMember {
        user_id: row.get("user_id"),
        role: ShelterRole::parse(&role).unwrap_or(ShelterRole::Staff),
        joined_at: row.get("joined_at"),
    }
}

fn member_view_from_row(row: &sqlx::sqlite::SqliteRow) -> ShelterMemberView {
    let role: String = row.get("role");
    ShelterMemberView {
        user_id: row.get("user_id"),
        name: row.get("name"),
        email: row.get("email"),
        role: ShelterRole::parse(&role).unwrap_or(ShelterRole::Staff),
        joined_at: row.get("joined_at"),
    }
}

fn invite_from_row(row: &sqlx::sqlite::SqliteRow) -> ShelterInvite {
    let role: String = row.get("role");
    let status: String = row.get("status");
    ShelterInvite {
        id: row.get("id"),
        shelter_id: row.get("shelter_id"),
        email: row.get("email"),
        role: ShelterRole::parse(&role).unwrap_or(ShelterRole::Staff),
        // An unparseable status invalidates the invite rather than reviving it
        status: InviteStatus::parse(&status).unwrap_or(InviteStatus::Expired),
        invited_by: row.get("invited_by"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn pet_from_row(row: &sqlx::sqlite::SqliteRow) -> Pet {
    let vaccinated: i32 = row.get("vaccinated");
    let spayed: i32 = row.get("spayed");
    let photos_str: Option<String> = row.get("photo_urls");
    let size_str: Option<String> = row.get("size");
    let status: String = row.get("status");
    Pet {
        id: row.get("id"),
        shelter_id: row.get("shelter_id"),
        name: row.get("name"),
        species: row.get("species"),
        breed: row.get("breed"),
        age_months: row.get("age_months"),
        size: size_str.and_then(|s| PetSize::parse(&s)),
        vaccinated: vaccinated != 0,
        spayed: spayed != 0,
        photo_urls: photos_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        description: row.get("description"),
        status: PetStatus::parse(&status).unwrap_or(PetStatus::Inactive),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn adoption_from_row(row: &sqlx::sqlite::SqliteRow) -> AdoptionRequest {
    let status: String = row.get("status");
    AdoptionRequest {
        id: row.get("id"),
        pet_id: row.get("pet_id"),
        shelter_id: row.get("shelter_id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        household: row.get("household"),
        message: row.get("message"),
        status: AdoptionStatus::parse(&status).unwrap_or(AdoptionStatus::Pending),
        decision_notes: row.get("decision_notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn campaign_from_row(
    row: &sqlx::sqlite::SqliteRow,
    participants: Vec<CampaignParticipant>,
) -> Campaign {
    let status: String = row.get("status");
    Campaign {
        id: row.get("id"),
        pet_id: row.get("pet_id"),
        title: row.get("title"),
        description: row.get("description"),
        goal_cents: row.get("goal_cents"),
        raised_cents: row.get("raised_cents"),
        status: CampaignStatus::parse(&status).unwrap_or(CampaignStatus::Cancelled),
        participants,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn participant_from_row(row: &sqlx::sqlite::SqliteRow) -> CampaignParticipant {
    CampaignParticipant {
        name: row.get("name"),
        email: row.get("email"),
        amount_cents: row.get("amount_cents"),
        donated_at: row.get("donated_at"),
    }
}

fn booking_from_row(row: &sqlx::sqlite::SqliteRow) -> VetBooking {
    let status: String = row.get("status");
    VetBooking {
        id: row.get("id"),
        vet_name: row.get("vet_name"),
        slot_at: row.get("slot_at"),
        user_id: row.get("user_id"),
        pet_id: row.get("pet_id"),
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Cancelled),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

//! Typed rounds and records API.

use rounds_core::ledger::{LedgerService, RecordSubmission};
use rounds_core::round::Round;
use rounds_shared::types::{PageRequest, PageResponse, RecordId, RoundId};
use rounds_shared::{AppError, AppResult};
use tracing::{debug, info};

use crate::dto::{
    CreateRecordRequest, CreateRoundRequest, LoginRequest, ParticipantInfo, RecordInfo,
    RoundInfo, StartRoundRequest, assemble_round,
};
use crate::http::{ApiClient, AuthPolicy, Envelope};
use crate::session::{LoginPayload, Session, UserProfile};

/// Page size used when draining every record of a round.
const RECORD_PAGE_SIZE: u32 = 100;

/// Rounds service API.
#[derive(Debug, Clone)]
pub struct RoundsApi {
    client: ApiClient,
}

impl RoundsApi {
    /// Wraps a client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ========== Users ==========

    /// Logs in and stores the session.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<Session> {
        let login: LoginPayload = self
            .client
            .post("/users/login", request, AuthPolicy::Anonymous, Envelope::Bare)
            .await?;
        let session = Session::from(login);
        self.client.session().store(session.clone()).await?;
        info!(user_id = %session.user.user_id, "Logged in");
        Ok(session)
    }

    /// Fetches the signed-in user's profile.
    pub async fn profile(&self) -> AppResult<UserProfile> {
        self.client
            .get("/users/profile", &[], AuthPolicy::Bearer, Envelope::Bare)
            .await
    }

    /// Drops the local session.
    pub async fn logout(&self) -> AppResult<()> {
        self.client.session().clear().await
    }

    // ========== Rounds ==========

    /// Lists rounds visible to the user.
    pub async fn list_rounds(&self, page: &PageRequest) -> AppResult<PageResponse<RoundInfo>> {
        self.client
            .get("/rounds", &page.query_pairs(), AuthPolicy::Bearer, Envelope::Wrapped)
            .await
    }

    /// Lists the rounds the signed-in user created or joined.
    pub async fn my_rounds(&self, page: &PageRequest) -> AppResult<PageResponse<RoundInfo>> {
        self.client
            .get("/rounds/my", &page.query_pairs(), AuthPolicy::Bearer, Envelope::Wrapped)
            .await
    }

    /// Fetches one round.
    pub async fn get_round(&self, round_id: &RoundId) -> AppResult<RoundInfo> {
        self.client
            .get(&format!("/rounds/{round_id}"), &[], AuthPolicy::Bearer, Envelope::Wrapped)
            .await
    }

    /// Creates a round.
    pub async fn create_round(&self, request: &CreateRoundRequest) -> AppResult<RoundInfo> {
        self.client
            .post("/rounds", request, AuthPolicy::Bearer, Envelope::Wrapped)
            .await
    }

    /// Joins a waiting round.
    pub async fn join_round(&self, round_id: &RoundId) -> AppResult<()> {
        self.action(round_id, "join", &serde_json::json!({})).await
    }

    /// Leaves a waiting round.
    pub async fn leave_round(&self, round_id: &RoundId) -> AppResult<()> {
        self.action(round_id, "leave", &serde_json::json!({})).await
    }

    /// Starts a round. Creator only.
    pub async fn start_round(&self, round_id: &RoundId, has_table: bool) -> AppResult<()> {
        self.action(round_id, "start", &StartRoundRequest { has_table })
            .await
    }

    /// Pauses a round in progress. Creator only.
    pub async fn pause_round(&self, round_id: &RoundId) -> AppResult<()> {
        self.client
            .put(
                &format!("/rounds/{round_id}/pause"),
                &serde_json::json!({}),
                AuthPolicy::Bearer,
                Envelope::Wrapped,
            )
            .await
    }

    /// Resumes a paused round. Creator only.
    pub async fn resume_round(&self, round_id: &RoundId) -> AppResult<()> {
        self.action(round_id, "resume", &serde_json::json!({})).await
    }

    /// Ends a round.
    pub async fn end_round(&self, round_id: &RoundId) -> AppResult<()> {
        self.action(round_id, "end", &serde_json::json!({})).await
    }

    /// Deletes a round.
    pub async fn delete_round(&self, round_id: &RoundId) -> AppResult<()> {
        self.client
            .delete(&format!("/rounds/{round_id}"), AuthPolicy::Bearer, Envelope::Wrapped)
            .await
    }

    /// Lists a round's members.
    pub async fn participants(&self, round_id: &RoundId) -> AppResult<Vec<ParticipantInfo>> {
        self.client
            .get(
                &format!("/rounds/{round_id}/participants"),
                &[],
                AuthPolicy::Bearer,
                Envelope::Wrapped,
            )
            .await
    }

    async fn action<B: serde::Serialize>(&self, round_id: &RoundId, verb: &str, body: &B) -> AppResult<()> {
        self.client
            .post(
                &format!("/rounds/{round_id}/{verb}"),
                body,
                AuthPolicy::Bearer,
                Envelope::Wrapped,
            )
            .await
    }

    // ========== Records ==========

    /// Lists one page of a round's records.
    pub async fn records(&self, round_id: &RoundId, page: &PageRequest) -> AppResult<PageResponse<RecordInfo>> {
        self.client
            .get(
                &format!("/records/round/{round_id}"),
                &page.query_pairs(),
                AuthPolicy::Bearer,
                Envelope::Wrapped,
            )
            .await
    }

    /// Fetches every record of a round, page by page.
    pub async fn all_records(&self, round_id: &RoundId) -> AppResult<Vec<RecordInfo>> {
        let mut page = PageRequest::new(0, RECORD_PAGE_SIZE);
        let mut records = Vec::new();
        loop {
            let response = self.records(round_id, &page).await?;
            let fetched = response.content.len();
            records.extend(response.content);
            if !response.has_next || fetched == 0 {
                break;
            }
            page = page.next();
        }
        Ok(records)
    }

    /// Submits a game result.
    ///
    /// The submission is checked against the roster first; an unbalanced
    /// or malformed result never leaves the process.
    pub async fn submit_record(&self, round: &Round, submission: &RecordSubmission) -> AppResult<RecordInfo> {
        if submission.round_id != round.id {
            return Err(AppError::Validation(format!(
                "submission is for round {}, not {}",
                submission.round_id, round.id
            )));
        }
        LedgerService::validate_submission(&round.roster, submission)?;

        let request = CreateRecordRequest::from(submission);
        let record: RecordInfo = self
            .client
            .post("/records", &request, AuthPolicy::Bearer, Envelope::Wrapped)
            .await?;
        debug!(round_id = %round.id, record_id = %record.record_id, "Record submitted");
        Ok(record)
    }

    /// Deletes a record.
    pub async fn delete_record(&self, record_id: &RecordId) -> AppResult<()> {
        self.client
            .delete(&format!("/records/{record_id}"), AuthPolicy::Bearer, Envelope::Wrapped)
            .await
    }

    /// Fetches a round with its members and records, ready to settle.
    pub async fn load_round(&self, round_id: &RoundId) -> AppResult<Round> {
        let info = self.get_round(round_id).await?;
        let participants = if info.participants.is_empty() {
            self.participants(round_id).await?
        } else {
            info.participants.clone()
        };
        let records = self.all_records(round_id).await?;
        Ok(assemble_round(&info, &participants, records))
    }
}

//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use rps_escrow_core::{
    AccountId, Call, ChallengeCreated, Claimed, CommitmentHash, Escrow, EscrowConfig,
    EscrowEvent, InMemoryLedger, Ledger, Move, Outcome, Reclaimed, RecordStatus, RevealAccepted,
    RewardsComputed, Role, Secret,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ============ Request/Response types ============

#[derive(Deserialize, Default)]
pub struct CreateAccountRequest {
    pub balance: Option<u64>,
}

#[derive(Deserialize)]
pub struct FundAccountRequest {
    pub amount: u64,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub balance: u64,
}

#[derive(Deserialize)]
pub struct HashRequest {
    #[serde(rename = "move")]
    pub mv: Move,
    pub secret: Secret,
}

#[derive(Serialize)]
pub struct HashResponse {
    pub commitment: CommitmentHash,
}

#[derive(Deserialize)]
pub struct RegisterChallengeRequest {
    pub commitment: CommitmentHash,
    pub timeout_secs: u64,
    pub value: u64,
}

#[derive(Deserialize)]
pub struct AcceptChallengeRequest {
    pub commitment: CommitmentHash,
    pub value: u64,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    #[serde(rename = "move")]
    pub mv: Move,
    pub secret: Secret,
}

#[derive(Serialize)]
pub struct ChallengeCreatedResponse {
    #[serde(flatten)]
    pub event: ChallengeCreated,
    pub deadline_at: Option<String>,
}

impl From<ChallengeCreated> for ChallengeCreatedResponse {
    fn from(event: ChallengeCreated) -> Self {
        Self {
            deadline_at: rfc3339(event.deadline),
            event,
        }
    }
}

#[derive(Serialize)]
pub struct RevealResponse {
    pub reveal: RevealAccepted,
    pub rewards: Option<RewardsComputed>,
}

#[derive(Serialize)]
pub struct ChallengeResponse {
    pub commitment: CommitmentHash,
    pub proposer: Option<AccountId>,
    pub stake: u64,
    pub deadline: u64,
    pub deadline_at: Option<String>,
    pub role: Option<Role>,
    pub status: Option<RecordStatus>,
    pub counterparty: Option<CommitmentHash>,
    #[serde(rename = "revealed_move")]
    pub revealed: Option<Move>,
    pub outcome: Option<Outcome>,
    pub credited: u64,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<EscrowEvent>,
}

#[derive(Serialize)]
pub struct EscrowStatusResponse {
    pub account_id: AccountId,
    pub balance: u64,
    pub escrowed_total: u64,
    pub now: u64,
    pub config: EscrowConfig,
    pub faucet_balance: u64,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: u64,
}

#[derive(Serialize)]
pub struct TickResponse {
    pub now: u64,
    pub now_at: Option<String>,
}

#[derive(Deserialize)]
struct DirectTransfer {
    #[serde(default)]
    value: u64,
}

// ============ Helpers ============

/// Header identifying the calling account
pub const CALLER_HEADER: &str = "X-Account-Id";

fn caller(headers: &HeaderMap) -> Result<AccountId, ApiError> {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or(ApiError::MissingCaller)
}

fn rfc3339(timestamp: u64) -> Option<String> {
    let secs = i64::try_from(timestamp).ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|t| t.to_rfc3339())
}

// ============ Account handlers ============

pub async fn create_account(
    State(state): State<AppState>,
    body: Option<Json<CreateAccountRequest>>,
) -> Json<AccountResponse> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let account_id = state.open_account(req.balance);
    tracing::info!("Opened account {}", account_id);

    Json(AccountResponse {
        account_id,
        balance: state.balance(&account_id),
    })
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Json<AccountResponse> {
    let account_id = AccountId::from_uuid(account_id);
    Json(AccountResponse {
        account_id,
        balance: state.balance(&account_id),
    })
}

pub async fn fund_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<FundAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account_id = AccountId::from_uuid(account_id);
    let balance = state.fund_account(&account_id, req.amount)?;
    Ok(Json(AccountResponse {
        account_id,
        balance,
    }))
}

// ============ Escrow handlers ============

pub async fn hash_move(Json(req): Json<HashRequest>) -> Json<HashResponse> {
    Json(HashResponse {
        commitment: Escrow::<InMemoryLedger>::hash_move(req.mv, &req.secret),
    })
}

pub async fn register_challenge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterChallengeRequest>,
) -> Result<Json<ChallengeCreatedResponse>, ApiError> {
    let call = Call::paying(caller(&headers)?, req.value);
    let event = state
        .with_escrow(|escrow| escrow.register_challenge(call, req.commitment, req.timeout_secs))?;
    Ok(Json(event.into()))
}

pub async fn get_challenge(
    State(state): State<AppState>,
    Path(commitment): Path<CommitmentHash>,
) -> Json<ChallengeResponse> {
    let response = state.with_escrow(|escrow| {
        let info = escrow.challenge(&commitment);
        let record = escrow.record(&commitment);
        ChallengeResponse {
            commitment,
            proposer: info.proposer,
            stake: info.stake,
            deadline: info.deadline,
            deadline_at: record.and_then(|r| rfc3339(r.deadline)),
            role: record.map(|r| r.role),
            status: record.map(|r| r.status),
            counterparty: record.and_then(|r| r.counterparty),
            revealed: record.and_then(|r| r.revealed),
            outcome: record.and_then(|r| r.outcome),
            credited: record.map(|r| r.credited).unwrap_or(0),
        }
    });
    Json(response)
}

pub async fn accept_challenge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_key): Path<CommitmentHash>,
    Json(req): Json<AcceptChallengeRequest>,
) -> Result<Json<ChallengeCreatedResponse>, ApiError> {
    let call = Call::paying(caller(&headers)?, req.value);
    let event =
        state.with_escrow(|escrow| escrow.accept_challenge(call, game_key, req.commitment))?;
    Ok(Json(event.into()))
}

pub async fn deposit_reveal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_key): Path<CommitmentHash>,
    Json(req): Json<RevealRequest>,
) -> Result<Json<RevealResponse>, ApiError> {
    let call = Call::from(caller(&headers)?);
    let receipt =
        state.with_escrow(|escrow| escrow.deposit_reveal(call, game_key, req.mv, req.secret))?;
    Ok(Json(RevealResponse {
        reveal: receipt.reveal,
        rewards: receipt.rewards,
    }))
}

pub async fn claim(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_key): Path<CommitmentHash>,
) -> Result<Json<Claimed>, ApiError> {
    let call = Call::from(caller(&headers)?);
    let claimed = state.with_escrow(|escrow| escrow.claim(call, game_key))?;
    Ok(Json(claimed))
}

pub async fn reclaim_timeout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(commitment): Path<CommitmentHash>,
) -> Result<Json<Reclaimed>, ApiError> {
    let call = Call::from(caller(&headers)?);
    let reclaimed = state.with_escrow(|escrow| escrow.reclaim_timeout(call, commitment))?;
    Ok(Json(reclaimed))
}

pub async fn list_events(State(state): State<AppState>) -> Json<EventsResponse> {
    let events = state.with_escrow(|escrow| escrow.events().to_vec());
    Json(EventsResponse { events })
}

pub async fn escrow_status(State(state): State<AppState>) -> Json<EscrowStatusResponse> {
    let status = state.with_escrow(|escrow| EscrowStatusResponse {
        account_id: escrow.account(),
        balance: escrow.balance(),
        escrowed_total: escrow.escrowed_total(),
        now: escrow.ledger().now(),
        config: *escrow.config(),
        faucet_balance: state.faucet_balance(),
    });
    Json(status)
}

/// Any request that does not name an operation is a direct transfer, and
/// those are always refused.
pub async fn direct_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(), ApiError> {
    let sender = caller(&headers).unwrap_or_else(|_| AccountId::from_uuid(Uuid::nil()));
    let value = serde_json::from_slice::<DirectTransfer>(&body)
        .map(|t| t.value)
        .unwrap_or(0);

    state.with_escrow(|escrow| escrow.receive(Call::paying(sender, value)))?;
    Ok(())
}

// ============ System handlers ============

pub async fn tick(State(state): State<AppState>, Json(req): Json<TickRequest>) -> Json<TickResponse> {
    let now = state.advance_time(req.seconds);
    tracing::info!("Advanced simulated time by {}s to {}", req.seconds, now);
    Json(TickResponse {
        now,
        now_at: rfc3339(now),
    })
}

pub async fn health() -> &'static str {
    "ok"
}

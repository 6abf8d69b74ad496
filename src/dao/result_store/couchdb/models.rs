use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dao::{models::MatchResultEntity, result_store::couchdb::error::CouchDaoError},
    state::scoring::{Side, Tally},
};

pub const RESULT_PREFIX: &str = "result::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

/// One recorded match, stored under `result::<match id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchResultDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub result: ResultBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBody {
    pub session_id: Uuid,
    pub side_a: String,
    pub side_b: String,
    pub winner: Side,
    pub winner_id: String,
    pub score: String,
    pub sets_won_a: u32,
    pub sets_won_b: u32,
    pub completed_sets: Vec<Tally>,
    pub recorded_at: SystemTime,
}

impl From<(MatchResultEntity, Option<String>)> for CouchResultDocument {
    fn from((result, rev): (MatchResultEntity, Option<String>)) -> Self {
        Self {
            id: result_doc_id(&result.match_id),
            rev,
            result: ResultBody {
                session_id: result.session_id,
                side_a: result.side_a,
                side_b: result.side_b,
                winner: result.winner,
                winner_id: result.winner_id,
                score: result.score,
                sets_won_a: result.sets_won_a,
                sets_won_b: result.sets_won_b,
                completed_sets: result.completed_sets,
                recorded_at: result.recorded_at,
            },
        }
    }
}

impl TryFrom<CouchResultDocument> for MatchResultEntity {
    type Error = CouchDaoError;

    fn try_from(doc: CouchResultDocument) -> Result<Self, Self::Error> {
        let match_id = extract_match_id(&doc.id)?;
        let body = doc.result;
        Ok(Self {
            match_id,
            session_id: body.session_id,
            side_a: body.side_a,
            side_b: body.side_b,
            winner: body.winner,
            winner_id: body.winner_id,
            score: body.score,
            sets_won_a: body.sets_won_a,
            sets_won_b: body.sets_won_b,
            completed_sets: body.completed_sets,
            recorded_at: body.recorded_at,
        })
    }
}

pub fn result_doc_id(match_id: &str) -> String {
    format!("{}{}", RESULT_PREFIX, match_id)
}

pub fn extract_match_id(doc_id: &str) -> Result<String, CouchDaoError> {
    doc_id
        .strip_prefix(RESULT_PREFIX)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
        })
}

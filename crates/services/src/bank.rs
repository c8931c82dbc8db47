use reqwest::{Client, Url};
use storage::JsonQuestionBank;
use tracing::info;

use crate::error::BankFetchError;

/// Download and validate a question document.
///
/// The whole document is fetched once; section pools are then served from memory.
///
/// # Errors
///
/// Returns `BankFetchError` when the request fails, the server answers with a
/// non-success status, or the document does not parse.
pub async fn fetch_question_bank(
    client: &Client,
    url: Url,
) -> Result<JsonQuestionBank, BankFetchError> {
    let response = client.get(url.clone()).send().await?;

    if !response.status().is_success() {
        return Err(BankFetchError::HttpStatus(response.status()));
    }

    let body = response.text().await?;
    let bank = JsonQuestionBank::from_json(&body)?;
    info!(%url, questions = bank.len(), "question bank fetched");
    Ok(bank)
}

use crate::error::{HarnessError, Result};
use crate::session::Session;
use thirtyfour::By;
use tracing::debug;

/// Name attribute of the search engine's query input
pub const SEARCH_INPUT_NAME: &str = "q";

/// Submit a query through the start page's search control
///
/// Locates the query input, types the query and submits its enclosing form,
/// navigating the session to a results page.
pub async fn search(session: &Session, query: &str) -> Result<()> {
    debug!("Searching for: {}", query);

    let input = session
        .driver()
        .find_all(By::Name(SEARCH_INPUT_NAME))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            HarnessError::element_not_found(format!(
                "no search input matching name '{}'",
                SEARCH_INPUT_NAME
            ))
        })?;

    input.send_keys(query).await?;
    session
        .driver()
        .execute("arguments[0].form.submit();", vec![input.to_json()?])
        .await?;

    Ok(())
}

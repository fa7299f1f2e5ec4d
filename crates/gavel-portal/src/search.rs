use crate::Result;
use crate::selectors;
use gavel_browser::PortalSession;
use gavel_core::record::HearingContext;

/// Fill the hearing-search form for one (division, date) pair and submit.
///
/// The location dropdown is keyed by the judge label, the courtroom
/// dropdown by its visible text, and both ends of the date range get the
/// same day so the grid returns exactly that day's hearings.
pub async fn submit_search(session: &PortalSession, context: &HearingContext) -> Result<()> {
    tracing::debug!(
        "Searching {} for hearings on {}",
        context.courtroom,
        context.date_string()
    );

    session
        .select_by_value(selectors::LOCATION_GROUP_SELECT, &context.judge)
        .await?;
    session
        .select_by_value(selectors::SEARCH_BY_SELECT, selectors::SEARCH_BY_COURTROOM)
        .await?;
    session
        .select_by_label(selectors::COURTROOM_SELECT, &context.courtroom)
        .await?;

    let date = context.date_string();
    session.type_into(selectors::DATE_FROM_INPUT, &date).await?;
    session.type_into(selectors::DATE_TO_INPUT, &date).await?;

    session.click(selectors::SEARCH_SUBMIT).await?;

    Ok(())
}

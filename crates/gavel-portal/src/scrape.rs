use crate::extract::{self, PartySection};
use crate::selectors;
use crate::{Error, Result};
use gavel_browser::PortalSession;
use gavel_core::record::{ChargeRow, Defendant, HearingContext, PartyRow, map_charge_cells};

/// Everything scraped from one (division, date) search
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub parties: Vec<PartyRow>,
    pub charges: Vec<ChargeRow>,
}

/// Snapshot of the party information panel: one entry per child section.
const PARTY_SECTIONS_JS: &str = r#"(() => {
    const panel = document.querySelector('#divPartyInformation_body');
    if (!panel) return [];
    return Array.from(panel.children).map(div => ({
        text: div.innerText || '',
        fields: Array.from(div.querySelectorAll('p')).map(p => {
            const span = p.querySelector('span');
            return [span ? (span.innerText || '') : '', p.innerText || ''];
        })
    }));
})()"#;

/// Snapshot of the charge grid: header text plus each master row's cells.
const CHARGE_GRID_JS: &str = r#"(() => {
    const panel = document.querySelector('#chargeInformationDiv');
    if (!panel) return { header_text: '', rows: [] };
    const thead = panel.querySelector('thead');
    const rows = Array.from(panel.querySelectorAll('tbody tr.k-master-row')).map(tr =>
        Array.from(tr.querySelectorAll('td')).map(td => td.innerText || '')
    );
    return { header_text: thead ? (thead.innerText || '') : '', rows };
})()"#;

#[derive(Debug, serde::Deserialize)]
struct ChargeGridDump {
    header_text: String,
    rows: Vec<Vec<String>>,
}

/// Walk every page of the results grid, opening each case's detail view
/// and collecting party and charge rows.
///
/// Finishes back on the search form so the caller can submit the next
/// search immediately.
pub async fn scrape_results(
    session: &PortalSession,
    context: &HearingContext,
) -> Result<ScrapeOutcome> {
    let mut outcome = ScrapeOutcome::default();

    // An empty grid at the deadline means no hearings that day, not a
    // failure; the run moves on to the next search.
    if !results_ready(session).await? {
        tracing::warn!(
            "No hearings listed for {} on {}",
            context.courtroom,
            context.date_string()
        );
        session.click(selectors::SEARCH_TAB_LINK).await?;
        return Ok(outcome);
    }

    let last_page = last_page_number(session).await?;
    tracing::debug!("Results span {} page(s)", last_page);

    let mut page_number: u32 = 1;
    while page_number <= last_page {
        // Pages past the first reload the grid; wait for it to settle.
        session
            .wait_until_text_gone(selectors::RESULTS_GRID, selectors::NO_ITEMS_TEXT)
            .await?;

        let row_count = session.find_all(selectors::RESULTS_ROWS).await?.len();
        tracing::debug!("Page {}: {} case rows", page_number, row_count);

        for row_index in 1..=row_count {
            // Address rows by position: opening a detail view and coming
            // back can redraw the grid and stale any held element handle.
            let anchor = format!(
                "{} tbody tr:nth-child({}) a",
                selectors::RESULTS_GRID,
                row_index
            );

            let case_number = session
                .attribute(&anchor, "title")
                .await?
                .map(|title| extract::clean_text(&title))
                .filter(|title| !title.is_empty())
                .ok_or(Error::MissingCaseNumber {
                    page: page_number,
                    row: row_index,
                })?;
            tracing::debug!("Scraping case {}", case_number);

            session.click(&anchor).await?;

            outcome
                .parties
                .push(scrape_party_panel(session, &case_number, context).await?);
            outcome
                .charges
                .extend(scrape_charge_grid(session, &case_number).await?);

            // Back to the results list for the next row.
            session.click(selectors::RESULTS_TAB_LINK).await?;
        }

        if page_number < last_page {
            session.click(selectors::NEXT_PAGE_LINK).await?;
        }
        page_number += 1;
    }

    // Back to the search form for the next (division, date) pair.
    session.click(selectors::SEARCH_TAB_LINK).await?;

    Ok(outcome)
}

/// Wait for the grid to drop its empty placeholder.
///
/// Returns false when the placeholder is still there at the deadline.
async fn results_ready(session: &PortalSession) -> Result<bool> {
    match session
        .wait_until_text_gone(selectors::RESULTS_GRID, selectors::NO_ITEMS_TEXT)
        .await
    {
        Ok(()) => Ok(true),
        Err(gavel_browser::Error::WaitTimeout { .. }) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Page count from the pager's last-page link.
///
/// Kendo grids hide the pager entirely when one page holds everything,
/// so an absent link means a single page.
async fn last_page_number(session: &PortalSession) -> Result<u32> {
    if !session.exists(selectors::LAST_PAGE_LINK).await? {
        return Ok(1);
    }

    let raw = session
        .attribute(selectors::LAST_PAGE_LINK, "data-page")
        .await?
        .ok_or_else(|| Error::Pager("missing data-page attribute".to_string()))?;

    raw.trim().parse().map_err(|_| Error::Pager(raw))
}

async fn scrape_party_panel(
    session: &PortalSession,
    case_number: &str,
    context: &HearingContext,
) -> Result<PartyRow> {
    session.wait_for(selectors::PARTY_PANEL).await?;

    let sections: Vec<PartySection> = session.evaluate(PARTY_SECTIONS_JS).await?;
    let fields = extract::defendant_fields(&sections)?;
    let defendant = Defendant::from_fields(&fields)?;

    Ok(PartyRow::new(case_number, context.clone(), defendant)?)
}

async fn scrape_charge_grid(
    session: &PortalSession,
    case_number: &str,
) -> Result<Vec<ChargeRow>> {
    session.wait_for(selectors::CHARGE_PANEL).await?;

    let dump: ChargeGridDump = session.evaluate(CHARGE_GRID_JS).await?;
    let headers = extract::charge_headers(&dump.header_text);

    dump.rows
        .iter()
        .map(|cells| Ok(map_charge_cells(case_number, &headers, cells)?))
        .collect()
}

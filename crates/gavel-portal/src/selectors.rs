//! Element ids and selectors of the portal's hearing-search UI.
//!
//! The portal publishes no API; these are the fixed ids and attributes of
//! its rendered markup, kept in one place so a markup change is a
//! one-file fix.

// Login page
pub const USERNAME_INPUT: &str = "#UserName";
pub const PASSWORD_INPUT: &str = "#Password";
pub const LOGIN_BUTTON: &str = "button.btn-primary";

// Landing page portlet that opens the hearing search
pub const HEARINGS_PORTLET: &str = "#portlet-26";

// Hearing search form
pub const LOCATION_GROUP_SELECT: &str = "#cboHSLocationGroup";
pub const SEARCH_BY_SELECT: &str = "#cboHSSearchBy";
pub const COURTROOM_SELECT: &str = "#selHSCourtroom";
pub const DATE_FROM_INPUT: &str = "#SearchCriteria_DateFrom";
pub const DATE_TO_INPUT: &str = "#SearchCriteria_DateTo";
pub const SEARCH_SUBMIT: &str = "#btnHSSubmit";

/// Option value of the search-by dropdown that enables courtroom search
pub const SEARCH_BY_COURTROOM: &str = "Courtroom";

// Results grid and its Kendo pager
pub const RESULTS_GRID: &str = "#hearingResultsGrid";
pub const RESULTS_ROWS: &str = "#hearingResultsGrid tbody tr";
pub const LAST_PAGE_LINK: &str = "a[title='Go to the last page']";
pub const NEXT_PAGE_LINK: &str = "a[title='Go to the next page']";

/// Placeholder the grid renders while empty
pub const NO_ITEMS_TEXT: &str = "No items to display";

// Case detail panels
pub const PARTY_PANEL: &str = "#divPartyInformation_body";
pub const CHARGE_PANEL: &str = "#chargeInformationDiv";

// Tab controller links: 0 = search form, 1 = results list
pub const SEARCH_TAB_LINK: &str = "#tcControllerLink_0";
pub const RESULTS_TAB_LINK: &str = "#tcControllerLink_1";

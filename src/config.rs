use std::time::Duration;
use url::Url;

// Server contract of the course search flow. These ids are generated by the
// remote JSF application and only change when the search mask is redeployed.

pub const BASE_URL: &str = "https://wuestudy.zv.uni-wuerzburg.de";
pub const SEARCH_PATH: &str = "/qisserver/pages/cm/exa/coursemanagement/basicCourseData.xhtml";
pub const FLOW_ID: &str = "searchCourseNonStaff-flow";

/// Domain that canonical course permalinks point into.
pub const LINK_DOMAIN: &str = "uni-wuerzburg.de";

pub const AUTH_TOKEN: &str = "authenticity_token";
pub const VIEW_STATE: &str = "javax.faces.ViewState";
pub const SUBMIT_SEARCH: &str = "genericSearchMask_SUBMIT";

pub const SEARCH_FIELD: &str = "genericSearchMask:search_e4ff321960e251186ac57567bec9f4ce:cm_exa_eventprocess_basic_data:fieldset:inputField_0_1ad08e26bde39c9e4f1833e56dcce9b5:id1ad08e26bde39c9e4f1833e56dcce9b5";
pub const TERM_SELECT_FIELD: &str = "genericSearchMask:search_e4ff321960e251186ac57567bec9f4ce:cm_exa_eventprocess_basic_data:fieldset:inputField_3_abb156a1126282e4cf40d48283b4e76d:idabb156a1126282e4cf40d48283b4e76d:termSelect";
pub const TERM_SELECT_INPUT_FIELD: &str = "genericSearchMask:search_e4ff321960e251186ac57567bec9f4ce:cm_exa_eventprocess_basic_data:fieldset:inputField_3_abb156a1126282e4cf40d48283b4e76d:idabb156a1126282e4cf40d48283b4e76d:termSelectInput";
pub const SEARCH_MASK_ID: &str = SEARCH_FIELD;
pub const SEARCH_BUTTON: &str = "genericSearchMask:buttonsBottom:search";

pub const NAVI_NUM_ROWS: &str = "genSearchRes:id3df798d58b4bacd9:id3df798d58b4bacd9NaviNumRowsInput";
pub const NAVI2_NUM_ROWS: &str = "genSearchRes:id3df798d58b4bacd9:id3df798d58b4bacd9Navi2NumRowsInput";
pub const NAVI_ABOVE_TABLE: &str = "genSearchRes:id3df798d58b4bacd9:j_id_5q_l_hk_11:j_id_5q_l_hk_83:j_id_5q_l_hk_87";
pub const NAVI_BELOW_TABLE: &str = "genSearchRes:id3df798d58b4bacd9:j_id_5q_l_hk_11:j_id_5q_l_hk_83:j_id_5q_l_hk_89";
pub const TABLE_COLUMNS: &str = "genSearchRes:id3df798d58b4bacd9:j_id_5q_l_hk_11:j_id_5q_l_hk_1b:cols";
pub const TABLE_PAGE_SIZE: &str = "genSearchRes:id3df798d58b4bacd9:j_id_5q_l_hk_11:j_id_5q_l_hk_ar:defaultTablePageSize";
pub const RESULTS_SUBMIT: &str = "genSearchRes_SUBMIT";
pub const RESULTS_FORM_CLICK: &str = "genSearchRes:_idcl";
pub const RESULTS_SAVE_BUTTON: &str = "genSearchRes:id3df798d58b4bacd9:j_id_5q_l_hk_11:save";
pub const NEXT_PAGE_BUTTON: &str = "genSearchRes:id3df798d58b4bacd9:id3df798d58b4bacd9Navi2next";

/// Id of the `<table>` holding the search results.
pub const RESULTS_TABLE_ID: &str = "genSearchRes:id3df798d58b4bacd9:id3df798d58b4bacd9Table";

/// Column order requested from the server; the extractor relies on it.
pub const RESULT_COLUMNS: [&str; 8] = [
    "ActionsBefore",
    "sul.common.Unit.elementnr",
    "sul.plan.searchLecture.veranstTitle",
    "sul.common.Course.eventtypeId",
    "cm.exa.eventprocess.responsible_instructor",
    "cm.exa.eventprocess.instructor",
    "cm.exa.Unit.Orgunit",
    "ActionsAfter",
];

/// Cookies the browser sets by script after the search page loads.
pub const SEEDED_COOKIES: [(&str, &str); 2] = [("download-complete", ""), ("sessionRefresh", "0")];

/// Label of the contact hours field on a course detail page.
pub const SWS_LABEL: &str = "Semesterwochenstunden";

pub const DEFAULT_PAGE_SIZE: usize = 300;
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("course_search/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub page_size: usize,
    /// Upper bound on simultaneous detail page requests.
    pub concurrency_limit: usize,
    pub request_timeout: Option<Duration>,
    pub link_domain: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Url::parse(BASE_URL).expect("BASE_URL is a valid url"),
            page_size: DEFAULT_PAGE_SIZE,
            concurrency_limit: DEFAULT_CONCURRENCY,
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            link_domain: LINK_DOMAIN.to_string(),
        }
    }
}

impl Config {
    pub fn search_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(SEARCH_PATH);
        url.set_query(None);
        url
    }
}

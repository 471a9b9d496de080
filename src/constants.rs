pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "webm", "mov", "wmv", "flv", "m4v", "mpg", "mpeg", "ts", "m2ts", "iso",
];

pub mod scan {

    /// Directory names never descended into while scanning a show.
    pub const EXCLUDED_DIRS: &[&str] = &["Extras", ".actors", "extrafanarts"];

    /// Filename fragments marking promotional clips rather than episodes.
    pub const EXCLUDED_FILE_MARKERS: &[&str] = &["-trailer", "-sample"];
}

pub mod disc {

    pub const DVD_DIR: &str = "VIDEO_TS";

    pub const DVD_INDEX: &str = "VIDEO_TS.IFO";

    pub const BLURAY_DIR: &str = "BDMV";

    pub const BLURAY_INDEX: &str = "index.bdmv";
}

pub mod progress {

    /// Cached shows emit an empty status line every this many episodes.
    pub const STATUS_REFRESH_EPISODES: usize = 1000;
}

pub mod nfo {

    pub const SHOW_NFO: &str = "tvshow.nfo";

    pub const EXTENSION: &str = "nfo";
}

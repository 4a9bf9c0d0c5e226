pub mod env {
    pub const INPUT_PATH: &str = "INPUT_PATH";
    pub const OUTPUT_PATH: &str = "OUTPUT_PATH";

    pub const APPLICATION_ID: &str = "EMR_APP_ID";
    pub const EXECUTION_ROLE: &str = "EMR_EXEC_ROLE";
}

pub mod columns {
    pub const LOCATION: &str = "location";
    pub const MEASUREMENT_TIME: &str = "measurement_time";
    pub const TEMPERATURE_C: &str = "temperature_c";
    pub const HUMIDITY_PCT: &str = "humidity_pct";
    pub const CO2_PPM: &str = "co2_ppm";

    pub const HOUR: &str = "hour";
    pub const AVG_TEMPERATURE_C: &str = "avg_temperature_c";
    pub const AVG_CO2_PPM: &str = "avg_co2_ppm";

    /// Header of the input dataset, in the order the original files use.
    pub const INPUT: [&str; 5] = [LOCATION, MEASUREMENT_TIME, TEMPERATURE_C, HUMIDITY_PCT, CO2_PPM];

    /// Header of the aggregated output dataset.
    pub const OUTPUT: [&str; 4] = [LOCATION, HOUR, AVG_TEMPERATURE_C, AVG_CO2_PPM];
}

pub mod layout {
    /// Key of the aggregation program, relative to the input bucket.
    pub const ENTRY_POINT_KEY: &str = "src/main";
    /// Key prefix for job run logs, relative to the output bucket.
    pub const LOG_PREFIX: &str = "logs/";

    pub const PART_FILE: &str = "part-00000.csv";
    pub const SUCCESS_MARKER: &str = "_SUCCESS";
}

pub mod schedule {
    /// 09:00 and 17:00 UTC every day.
    pub const DEFAULT_CRON: &str = "0 0 9,17 * * *";
}

pub const DEFAULT_EXECUTOR_MEMORY: &str = "2G";

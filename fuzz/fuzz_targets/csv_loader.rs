#![no_main]

use hotelstat::config::AnalysisConfig;
use hotelstat::dataset::Dataset;
use hotelstat::profile::profile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = AnalysisConfig::default_hotel_bookings() else {
        return;
    };
    // Malformed input must surface as an error, never a panic
    if let Ok(ds) = Dataset::from_csv_reader(data, &config.schema) {
        let _ = profile(&ds);
    }
});

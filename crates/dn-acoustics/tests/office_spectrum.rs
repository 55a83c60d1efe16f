use dn_acoustics::{
    ComplianceStatus, SpaceType, SpectrumShape, analyze_octave_band_data, calculate_overall_dba,
    compare_to_standards, determine_nc_rating, estimate_octave_bands_from_dba,
};
use dn_core::OctaveBands;

#[test]
fn measured_office_spectrum() {
    let levels = [60.0, 55.0, 50.0, 48.0, 45.0, 42.0, 40.0, 38.0];
    assert_eq!(determine_nc_rating(&levels), 45);

    let spectrum = OctaveBands::new(levels);
    let analysis = analyze_octave_band_data(&spectrum, Some(35)).unwrap();
    assert!(!analysis.meets_criteria);
    assert!((analysis.overall_dba - calculate_overall_dba(&levels)).abs() < 1e-12);

    let private = compare_to_standards(&analysis, SpaceType::lookup("private office"));
    assert_eq!(private.status, ComplianceStatus::Exceeds);
    assert_eq!(private.reduction_needed, 15);
}

#[test]
fn estimated_spectrum_rates_consistently() {
    let quiet = estimate_octave_bands_from_dba(30.0, SpectrumShape::DiffuserNoise);
    let loud = estimate_octave_bands_from_dba(60.0, SpectrumShape::DiffuserNoise);
    assert!(determine_nc_rating(loud.levels()) > determine_nc_rating(quiet.levels()));
}

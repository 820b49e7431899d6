//! Mapping model ids onto the download directory layout

use std::path::PathBuf;

/// Derives the relative output path for a model id.
///
/// The id's colon-separated segments become nested directories and the
/// trailing segment becomes the file name, with the `;` version separator
/// replaced by `_`. Segments are lower-cased. For example
/// `dtmi:rec33:architectural:building;1` with extension `dtdl` maps to
/// `dtmi/rec33/architectural/building_1.dtdl`.
pub fn model_file_path(model_id: &str, extension: &str) -> PathBuf {
    let mut segments: Vec<String> = model_id.split(':').map(str::to_lowercase).collect();
    let stem = segments.pop().unwrap_or_default();

    let mut path: PathBuf = segments.iter().collect();
    path.push(format!("{}.{}", stem.replace(';', "_"), extension));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn maps_a_versioned_id_to_a_nested_path() {
        let path = model_file_path("dtmi:digitaltwins:testing:core:space;1", "json");

        assert_eq!(
            path,
            Path::new("dtmi/digitaltwins/testing/core/space_1.json")
        );
    }

    #[test]
    fn lower_cases_every_segment() {
        let path = model_file_path("dtmi:Com:Example:Thermostat;2", "dtdl");

        assert_eq!(path, Path::new("dtmi/com/example/thermostat_2.dtdl"));
    }

    #[test]
    fn handles_an_id_without_a_version_marker() {
        let path = model_file_path("dtmi:core:space", "json");

        assert_eq!(path, Path::new("dtmi/core/space.json"));
    }

    #[test]
    fn handles_an_id_without_segments() {
        let path = model_file_path("standalone;1", "json");

        assert_eq!(path, Path::new("standalone_1.json"));
    }
}

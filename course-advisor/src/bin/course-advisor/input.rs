use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use course_advisor::catalog::CourseCatalog;
use course_advisor::catalog::CourseInfo;
use course_advisor::catalog::EquivalenceInfo;
use course_advisor::curriculum::Curriculum;
use course_advisor::curriculum::CurriculumData;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::result::AdvisorError;
use crate::result::AdvisorResult;

/// The layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    courses: Vec<CourseInfo>,
    #[serde(default)]
    equivalences: Vec<EquivalenceInfo>,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> AdvisorResult<T> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|error| AdvisorError::invalid_json(path.display(), error))
}

pub(crate) fn read_catalog(path: &Path) -> AdvisorResult<CourseCatalog> {
    let file: CatalogFile = read_json(path)?;
    debug!(
        "Read {} courses and {} equivalences from {}",
        file.courses.len(),
        file.equivalences.len(),
        path.display()
    );
    Ok(CourseCatalog::new(file.courses, file.equivalences))
}

pub(crate) fn read_curriculum(path: &Path, catalog: &CourseCatalog) -> AdvisorResult<Curriculum> {
    let data: CurriculumData = read_json(path)?;
    let curriculum = data.build(catalog)?;
    debug!(
        "Read curriculum with {} blocks from {}",
        curriculum.num_blocks(),
        path.display()
    );
    Ok(curriculum)
}

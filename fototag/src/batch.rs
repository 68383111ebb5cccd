//! Tagging many images in one go.
//!
//! Batches run strictly sequentially and item failures never abort the run.
//! Every input gets a terminal outcome, the overall [`Summary`] is derived
//! from the per-item results, and successful outputs are packaged either as
//! a single JPEG or as an uncompressed ZIP archive.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::asset::{ImageAsset, Status, MAX_FILES};
use crate::error::Error;
use crate::pipeline::{GeotagRequest, Pipeline};

/// Outcome of one batch item
#[derive(Debug)]
pub struct BatchItem {
    /// Name the output should be saved under
    pub file_name: String,
    pub result: Result<Vec<u8>, Error>,
}

/// Outcome of a whole batch, in input order
#[derive(Debug)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Summary {
    AllSucceeded { count: usize },
    Partial { succeeded: usize, failed: usize },
    AllFailed { count: usize },
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllSucceeded { count } => {
                write!(f, "Successfully tagged {count} image(s)")
            }
            Self::Partial { succeeded, failed } => {
                write!(f, "Tagged {succeeded} image(s), {failed} failed")
            }
            Self::AllFailed { count } => {
                write!(f, "Failed to tag all {count} image(s)")
            }
        }
    }
}

/// Packaged download for the successful outputs
#[derive(Debug)]
pub enum BatchOutput {
    /// A lone success is delivered as a plain JPEG
    Single { file_name: String, data: Vec<u8> },
    /// Multiple successes are bundled into one ZIP archive
    Archive { file_name: String, data: Vec<u8> },
}

impl BatchResult {
    pub fn summary(&self) -> Summary {
        let succeeded = self.items.iter().filter(|x| x.result.is_ok()).count();
        let failed = self.items.len() - succeeded;

        if failed == 0 {
            Summary::AllSucceeded { count: succeeded }
        } else if succeeded == 0 {
            Summary::AllFailed { count: failed }
        } else {
            Summary::Partial { succeeded, failed }
        }
    }

    /// Package the successful outputs for download.
    ///
    /// Returns `None` when nothing succeeded. JPEG data is already
    /// compressed, so archive entries are stored rather than deflated.
    pub fn output(&self) -> Result<Option<BatchOutput>, Error> {
        let successes: Vec<_> = self
            .items
            .iter()
            .filter_map(|x| x.result.as_ref().ok().map(|data| (&x.file_name, data)))
            .collect();

        match successes.as_slice() {
            [] => Ok(None),
            [(file_name, data)] => Ok(Some(BatchOutput::Single {
                file_name: (*file_name).clone(),
                data: (*data).clone(),
            })),
            _ => {
                let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
                let options =
                    SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

                for (file_name, data) in successes {
                    zip.start_file(file_name.as_str(), options)?;
                    zip.write_all(data)?;
                }

                Ok(Some(BatchOutput::Archive {
                    file_name: "geotagged_images.zip".into(),
                    data: zip.finish()?.into_inner(),
                }))
            }
        }
    }
}

/// Runs a [`GeotagRequest`] over a list of assets
#[derive(Debug, Default)]
pub struct BatchRunner {
    pipeline: Pipeline,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Tag every asset in order.
    ///
    /// The progress callback is invoked after each item with the number of
    /// finished items and the total. Assets are updated to
    /// [`Status::Tagged`] or [`Status::Failed`] as they complete.
    pub fn run(
        &self,
        assets: &mut [ImageAsset],
        request: &GeotagRequest,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<BatchResult, Error> {
        if assets.len() > MAX_FILES {
            return Err(crate::asset::ValidationError::TooManyFiles.into());
        }

        let total = assets.len();
        let mut file_names = FileNames::default();
        let mut items = Vec::with_capacity(total);

        for (n, asset) in assets.iter_mut().enumerate() {
            asset.set_status(Status::Processing);

            let result = self.pipeline.tag_image(
                asset.data().to_vec(),
                asset.media_type(),
                request,
            );

            match &result {
                Ok(_) => asset.set_status(Status::Tagged),
                Err(err) => {
                    tracing::info!("Failed to tag '{}': {err}", asset.name());
                    asset.set_status(Status::Failed);
                }
            }

            items.push(BatchItem {
                file_name: file_names.assign(asset.base_name()),
                result,
            });

            progress(n + 1, total);
        }

        Ok(BatchResult { items })
    }
}

/// Hands out collision-free output names
#[derive(Debug, Default)]
struct FileNames {
    used: HashMap<String, u32>,
}

impl FileNames {
    fn assign(&mut self, base_name: &str) -> String {
        let n = self.used.entry(base_name.to_string()).or_insert(0);
        *n += 1;

        if *n == 1 {
            format!("{base_name}_geotagged.jpg")
        } else {
            format!("{base_name}_geotagged_{n}.jpg")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_collisions() {
        let mut names = FileNames::default();
        assert_eq!(names.assign("img"), "img_geotagged.jpg");
        assert_eq!(names.assign("img"), "img_geotagged_2.jpg");
        assert_eq!(names.assign("other"), "other_geotagged.jpg");
    }

    #[test]
    fn summary_messages() {
        let all = Summary::AllSucceeded { count: 3 };
        assert_eq!(all.to_string(), "Successfully tagged 3 image(s)");

        let partial = Summary::Partial {
            succeeded: 2,
            failed: 1,
        };
        assert_eq!(partial.to_string(), "Tagged 2 image(s), 1 failed");

        let none = Summary::AllFailed { count: 2 };
        assert_eq!(none.to_string(), "Failed to tag all 2 image(s)");
    }
}

use super::{frame_to_mat, from_cv_rect, to_cv_rect};
use crate::algorithm::{Algorithm, AlgorithmDescriptor};
use crate::error::Error;
use crate::frame::Frame;
use crate::rect::Rect;
use crate::{TrackerFactory, Tracking};

use opencv::{
    core::{self, Mat, Ptr},
    prelude::*,
    tracking, video,
};

/// OpenCV tracker behind either the current or the legacy tracking API.
pub enum CvTracker {
    Modern(Ptr<video::Tracker>),
    /// MedianFlow, Boosting and TLD only exist in the legacy API, which
    /// reports success on init and works on sub-pixel boxes.
    Legacy(Ptr<tracking::legacy_Tracker>),
}

impl Tracking for CvTracker {
    type Image = Mat;

    fn init(&mut self, image: &Mat, rect: Rect) -> Result<bool, Error> {
        match self {
            CvTracker::Modern(inner) => {
                inner.init(image, to_cv_rect(&rect))?;
                Ok(true)
            }
            CvTracker::Legacy(inner) => Ok(inner.init(image, to_cv_rect2d(&rect))?),
        }
    }

    fn update(&mut self, image: &Mat) -> Result<(bool, Rect), Error> {
        match self {
            CvTracker::Modern(inner) => {
                let mut rect = core::Rect::default();
                let located = inner.update(image, &mut rect)?;

                Ok((located, from_cv_rect(rect)))
            }
            CvTracker::Legacy(inner) => {
                let mut rect = core::Rect2d::default();
                let located = inner.update(image, &mut rect)?;

                Ok((located, Rect::new(rect.x, rect.y, rect.width, rect.height)))
            }
        }
    }
}

#[inline]
fn to_cv_rect2d(rect: &Rect) -> core::Rect2d {
    core::Rect2d::new(rect.x, rect.y, rect.width, rect.height)
}

/// Creates one OpenCV tracker per slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct CvTrackerFactory;

impl TrackerFactory for CvTrackerFactory {
    type Tracker = CvTracker;

    fn prepare(&mut self, frame: &Frame) -> Result<Mat, Error> {
        frame_to_mat(frame)
    }

    fn create(&mut self, descriptor: &AlgorithmDescriptor) -> Result<CvTracker, Error> {
        let tracker = match descriptor.algorithm {
            Algorithm::Kcf => CvTracker::Modern(
                tracking::TrackerKCF::create(tracking::TrackerKCF_Params::default()?)?.into(),
            ),
            Algorithm::Csrt => CvTracker::Modern(
                tracking::TrackerCSRT::create(&tracking::TrackerCSRT_Params::default()?)?.into(),
            ),
            Algorithm::Mil => {
                CvTracker::Modern(video::TrackerMIL::create(video::TrackerMIL_Params::default()?)?.into())
            }
            Algorithm::MedianFlow => CvTracker::Legacy(
                tracking::legacy_TrackerMedianFlow::create(
                    &tracking::legacy_TrackerMedianFlow_Params::default()?,
                )?
                .into(),
            ),
            Algorithm::Boosting => CvTracker::Legacy(
                tracking::legacy_TrackerBoosting::create(
                    &tracking::legacy_TrackerBoosting_Params::default()?,
                )?
                .into(),
            ),
            Algorithm::Tld => CvTracker::Legacy(
                tracking::legacy_TrackerTLD::create(&tracking::legacy_TrackerTLD_Params::default()?)?
                    .into(),
            ),
        };

        Ok(tracker)
    }
}

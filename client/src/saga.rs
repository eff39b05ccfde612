//! Candidate save orchestration.
//!
//! No endpoint accepts a multipart file and structured fields in one
//! request, so saving a candidate with a photo takes two or three dependent
//! network calls with no server-side transaction around them. Each flow is a
//! saga: a later step can fail after an earlier one committed, and nothing
//! is rolled back or retried — a retry is always a fresh user action. The
//! saga records a named state per committed step so partial failure is
//! inspectable rather than implicit.
//!
//! Known limitation, kept on purpose: nothing prevents a second save from
//! starting while one is still in flight. Interleaved sagas stay safe at the
//! store level because they never write the candidate list directly, they
//! only trigger a refetch afterwards.

use hustings_shared::{Candidate, CandidateDraft, PhotoUpload};

use crate::api::{ApiError, ApiResult};

/// The seam between the sagas and the network, so the orchestration can be
/// exercised against a scripted gateway in tests.
pub trait CandidateGateway {
    type Photo;

    async fn create_candidate(&self, draft: &CandidateDraft) -> ApiResult<Candidate>;
    async fn update_candidate(&self, id: u32, draft: &CandidateDraft) -> ApiResult<Candidate>;
    async fn upload_photo(
        &self,
        photo: &Self::Photo,
        candidate_id: Option<u32>,
    ) -> ApiResult<PhotoUpload>;
}

/// Which part of a save flow failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    /// Client-side validation; nothing was sent.
    Validate,
    Create,
    UploadPhoto,
    Update,
}

/// Server-side state already committed when a later step failed. Nothing
/// cleans these up; the orphans are surfaced, not hidden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Committed {
    /// A candidate record that exists without its photo reference.
    pub candidate: Option<Candidate>,
    /// A photo stored on disk (resolved path), referenced by no record.
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SagaFailure {
    pub step: SagaStep,
    pub error: ApiError,
    pub committed: Committed,
}

impl SagaFailure {
    /// User-visible message for this failure point.
    pub fn message(&self) -> String {
        match self.step {
            SagaStep::Validate => self.error.to_string(),
            SagaStep::Create => format!("failed to create candidate: {}", self.error),
            SagaStep::UploadPhoto => {
                if self.committed.candidate.is_some() {
                    format!(
                        "photo upload failed; the candidate was saved without a photo: {}",
                        self.error
                    )
                } else {
                    format!("failed to upload photo: {}", self.error)
                }
            }
            SagaStep::Update => format!(
                "photo was stored but could not be recorded on the candidate: {}",
                self.error
            ),
        }
    }
}

/// Progress of one save operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SagaState {
    Idle,
    Created(Candidate),
    PhotoUploaded {
        candidate_id: Option<u32>,
        photo_path: String,
    },
    Updated(Candidate),
    Failed(SagaFailure),
}

/// One candidate-save operation. Construct per save; a saga is not reused.
pub struct SaveSaga<'a, G: CandidateGateway> {
    gateway: &'a G,
    state: SagaState,
}

impl<'a, G: CandidateGateway> SaveSaga<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            state: SagaState::Idle,
        }
    }

    pub fn state(&self) -> &SagaState {
        &self.state
    }

    /// New candidate with a photo, three steps: create the record with an
    /// empty `photo_path` so the upload can reference its id, upload the
    /// photo, then write the resolved path back onto the record.
    ///
    /// Failure at step 2 leaves a photo-less candidate; failure at step 3
    /// leaves the photo on disk with no record pointing at it.
    pub async fn create_with_photo(
        &mut self,
        draft: CandidateDraft,
        photo: &G::Photo,
    ) -> Result<Candidate, SagaFailure> {
        self.validate(&draft)?;

        let bare = CandidateDraft {
            photo_path: String::new(),
            ..draft.clone()
        };
        let created = match self.gateway.create_candidate(&bare).await {
            Ok(candidate) => candidate,
            Err(error) => return Err(self.fail(SagaStep::Create, error, Committed::default())),
        };
        self.state = SagaState::Created(created.clone());

        let upload = match self.gateway.upload_photo(photo, Some(created.id)).await {
            Ok(upload) => upload,
            Err(error) => {
                return Err(self.fail(
                    SagaStep::UploadPhoto,
                    error,
                    Committed {
                        candidate: Some(created),
                        photo_path: None,
                    },
                ));
            }
        };
        self.state = SagaState::PhotoUploaded {
            candidate_id: Some(created.id),
            photo_path: upload.photo_path.clone(),
        };

        let full = draft.with_photo(upload.photo_path.clone());
        match self.gateway.update_candidate(created.id, &full).await {
            Ok(updated) => {
                self.state = SagaState::Updated(updated.clone());
                Ok(updated)
            }
            Err(error) => Err(self.fail(
                SagaStep::Update,
                error,
                Committed {
                    candidate: Some(created),
                    photo_path: Some(upload.photo_path),
                },
            )),
        }
    }

    /// Existing candidate, new photo: upload against the known id, then
    /// update the record. Safer than the create flow — on any failure the
    /// candidate's previous state is untouched.
    pub async fn update_with_photo(
        &mut self,
        id: u32,
        draft: CandidateDraft,
        photo: &G::Photo,
    ) -> Result<Candidate, SagaFailure> {
        self.validate(&draft)?;

        let upload = match self.gateway.upload_photo(photo, Some(id)).await {
            Ok(upload) => upload,
            Err(error) => {
                return Err(self.fail(SagaStep::UploadPhoto, error, Committed::default()));
            }
        };
        self.state = SagaState::PhotoUploaded {
            candidate_id: Some(id),
            photo_path: upload.photo_path.clone(),
        };

        let full = draft.with_photo(upload.photo_path.clone());
        match self.gateway.update_candidate(id, &full).await {
            Ok(updated) => {
                self.state = SagaState::Updated(updated.clone());
                Ok(updated)
            }
            Err(error) => Err(self.fail(
                SagaStep::Update,
                error,
                Committed {
                    candidate: None,
                    photo_path: Some(upload.photo_path),
                },
            )),
        }
    }

    /// Quick-add: photo first (unassociated), then a single create carrying
    /// the resolved path. Two calls, and no window in which a photo-less
    /// candidate record exists.
    pub async fn quick_add(
        &mut self,
        draft: CandidateDraft,
        photo: &G::Photo,
    ) -> Result<Candidate, SagaFailure> {
        self.validate(&draft)?;

        let upload = match self.gateway.upload_photo(photo, None).await {
            Ok(upload) => upload,
            Err(error) => {
                return Err(self.fail(SagaStep::UploadPhoto, error, Committed::default()));
            }
        };
        self.state = SagaState::PhotoUploaded {
            candidate_id: None,
            photo_path: upload.photo_path.clone(),
        };

        let full = draft.with_photo(upload.photo_path.clone());
        match self.gateway.create_candidate(&full).await {
            Ok(created) => {
                self.state = SagaState::Created(created.clone());
                Ok(created)
            }
            Err(error) => Err(self.fail(
                SagaStep::Create,
                error,
                Committed {
                    candidate: None,
                    photo_path: Some(upload.photo_path),
                },
            )),
        }
    }

    /// Degenerate flow when no new photo was selected: a single create or
    /// update. An edit keeps whatever `photo_path` the record already had.
    pub async fn save(
        &mut self,
        id: Option<u32>,
        draft: CandidateDraft,
    ) -> Result<Candidate, SagaFailure> {
        self.validate(&draft)?;

        match id {
            None => match self.gateway.create_candidate(&draft).await {
                Ok(created) => {
                    self.state = SagaState::Created(created.clone());
                    Ok(created)
                }
                Err(error) => Err(self.fail(SagaStep::Create, error, Committed::default())),
            },
            Some(id) => match self.gateway.update_candidate(id, &draft).await {
                Ok(updated) => {
                    self.state = SagaState::Updated(updated.clone());
                    Ok(updated)
                }
                Err(error) => Err(self.fail(SagaStep::Update, error, Committed::default())),
            },
        }
    }

    fn validate(&mut self, draft: &CandidateDraft) -> Result<(), SagaFailure> {
        if draft.name.trim().is_empty() {
            return Err(self.fail(
                SagaStep::Validate,
                ApiError::Validation("name must not be empty".to_string()),
                Committed::default(),
            ));
        }
        Ok(())
    }

    fn fail(&mut self, step: SagaStep, error: ApiError, committed: Committed) -> SagaFailure {
        let failure = SagaFailure {
            step,
            error,
            committed,
        };
        self.state = SagaState::Failed(failure.clone());
        failure
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;

    use super::{CandidateGateway, SagaState, SagaStep, SaveSaga};
    use crate::api::{ApiError, ApiResult};
    use hustings_shared::{Candidate, CandidateDraft, PhotoUpload};

    const STORED_PATH: &str = "stored.jpg";

    #[derive(Default)]
    struct MockGateway {
        calls: RefCell<Vec<&'static str>>,
        fail_create: Option<ApiError>,
        fail_upload: Option<ApiError>,
        fail_update: Option<ApiError>,
    }

    impl MockGateway {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl CandidateGateway for MockGateway {
        type Photo = ();

        async fn create_candidate(&self, draft: &CandidateDraft) -> ApiResult<Candidate> {
            self.calls.borrow_mut().push("create");
            if let Some(error) = &self.fail_create {
                return Err(error.clone());
            }
            Ok(Candidate {
                id: 42,
                name: draft.name.clone(),
                description: draft.description.clone(),
                photo_path: draft.photo_path.clone(),
                votes: 0,
            })
        }

        async fn update_candidate(&self, id: u32, draft: &CandidateDraft) -> ApiResult<Candidate> {
            self.calls.borrow_mut().push("update");
            if let Some(error) = &self.fail_update {
                return Err(error.clone());
            }
            Ok(Candidate {
                id,
                name: draft.name.clone(),
                description: draft.description.clone(),
                photo_path: draft.photo_path.clone(),
                votes: 0,
            })
        }

        async fn upload_photo(
            &self,
            _photo: &Self::Photo,
            _candidate_id: Option<u32>,
        ) -> ApiResult<PhotoUpload> {
            self.calls.borrow_mut().push("upload");
            if let Some(error) = &self.fail_upload {
                return Err(error.clone());
            }
            Ok(PhotoUpload {
                photo_path: STORED_PATH.to_string(),
            })
        }
    }

    fn draft() -> CandidateDraft {
        CandidateDraft::new("Ada", "first")
    }

    fn transport() -> ApiError {
        ApiError::Transport("boom".to_string())
    }

    #[test]
    fn create_with_photo_runs_all_three_steps() {
        let gateway = MockGateway::default();
        let mut saga = SaveSaga::new(&gateway);
        let result = block_on(saga.create_with_photo(draft(), &())).unwrap();
        assert_eq!(gateway.calls(), vec!["create", "upload", "update"]);
        assert_eq!(result.photo_path, STORED_PATH);
        assert!(matches!(saga.state(), SagaState::Updated(_)));
    }

    #[test]
    fn upload_failure_leaves_photoless_candidate_and_skips_update() {
        let gateway = MockGateway {
            fail_upload: Some(transport()),
            ..MockGateway::default()
        };
        let mut saga = SaveSaga::new(&gateway);
        let failure = block_on(saga.create_with_photo(draft(), &())).unwrap_err();

        assert_eq!(failure.step, SagaStep::UploadPhoto);
        // Step 3 never ran: the orphan record stays photo-less.
        assert_eq!(gateway.calls(), vec!["create", "upload"]);
        let orphan = failure.committed.candidate.as_ref().unwrap();
        assert_eq!(orphan.photo_path, "");
        assert!(failure.committed.photo_path.is_none());
    }

    #[test]
    fn update_failure_reports_stored_but_unrecorded_photo() {
        let gateway = MockGateway {
            fail_update: Some(transport()),
            ..MockGateway::default()
        };
        let mut saga = SaveSaga::new(&gateway);
        let failure = block_on(saga.create_with_photo(draft(), &())).unwrap_err();

        assert_eq!(failure.step, SagaStep::Update);
        assert_eq!(failure.committed.photo_path.as_deref(), Some(STORED_PATH));
        // The record still carries no photo reference.
        assert_eq!(failure.committed.candidate.as_ref().unwrap().photo_path, "");
    }

    #[test]
    fn update_with_photo_aborts_cleanly_on_upload_failure() {
        let gateway = MockGateway {
            fail_upload: Some(transport()),
            ..MockGateway::default()
        };
        let mut saga = SaveSaga::new(&gateway);
        let failure = block_on(saga.update_with_photo(7, draft(), &())).unwrap_err();

        assert_eq!(failure.step, SagaStep::UploadPhoto);
        assert_eq!(gateway.calls(), vec!["upload"]);
        // The pre-existing candidate was never touched.
        assert_eq!(failure.committed, super::Committed::default());
    }

    #[test]
    fn quick_add_uploads_first_then_creates_in_one_shot() {
        let gateway = MockGateway::default();
        let mut saga = SaveSaga::new(&gateway);
        let created = block_on(saga.quick_add(draft(), &())).unwrap();

        assert_eq!(gateway.calls(), vec!["upload", "create"]);
        assert_eq!(created.photo_path, STORED_PATH);
        assert!(matches!(saga.state(), SagaState::Created(_)));
    }

    #[test]
    fn quick_add_create_failure_leaves_only_an_orphan_photo() {
        let gateway = MockGateway {
            fail_create: Some(transport()),
            ..MockGateway::default()
        };
        let mut saga = SaveSaga::new(&gateway);
        let failure = block_on(saga.quick_add(draft(), &())).unwrap_err();

        assert_eq!(failure.step, SagaStep::Create);
        assert!(failure.committed.candidate.is_none());
        assert_eq!(failure.committed.photo_path.as_deref(), Some(STORED_PATH));
    }

    #[test]
    fn unauthenticated_propagates_without_masking() {
        let gateway = MockGateway {
            fail_create: Some(ApiError::Unauthenticated),
            ..MockGateway::default()
        };
        let mut saga = SaveSaga::new(&gateway);
        let failure = block_on(saga.create_with_photo(draft(), &())).unwrap_err();
        assert_eq!(failure.error, ApiError::Unauthenticated);
    }

    #[test]
    fn empty_name_never_reaches_the_gateway() {
        let gateway = MockGateway::default();
        let mut saga = SaveSaga::new(&gateway);
        let failure =
            block_on(saga.create_with_photo(CandidateDraft::new("  ", ""), &())).unwrap_err();

        assert_eq!(failure.step, SagaStep::Validate);
        assert!(matches!(failure.error, ApiError::Validation(_)));
        assert!(gateway.calls().is_empty());
    }

    #[test]
    fn save_without_photo_is_a_single_call() {
        let gateway = MockGateway::default();
        let mut saga = SaveSaga::new(&gateway);
        block_on(saga.save(None, draft())).unwrap();
        assert_eq!(gateway.calls(), vec!["create"]);

        let gateway = MockGateway::default();
        let mut saga = SaveSaga::new(&gateway);
        block_on(saga.save(Some(9), draft().with_photo("kept.jpg"))).unwrap();
        assert_eq!(gateway.calls(), vec!["update"]);
    }
}

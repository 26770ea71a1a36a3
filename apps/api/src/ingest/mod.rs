// Input side of the pipeline: resume documents, job postings, whitespace cleanup.
// Nothing here raises; failures come back as empty strings for the caller to judge.

pub mod document;
pub mod job_posting;
pub mod normalize;

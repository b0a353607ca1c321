/// Subjects offered when uploading a paper and when filtering the review list.
pub const SUBJECTS: [&str; 16] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "Chinese",
    "Geography",
    "History",
    "Literature",
    "Economics",
    "Accounting",
    "Computer Science",
    "Art",
    "Music",
    "Physical Education",
    "Other",
];

#[must_use]
pub fn is_known_subject(subject: &str) -> bool {
    SUBJECTS.contains(&subject.trim())
}

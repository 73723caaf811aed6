mod common;
mod matching;
mod review;

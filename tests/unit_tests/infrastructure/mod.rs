mod crawler_test;
mod prompt_sanitizer_test;

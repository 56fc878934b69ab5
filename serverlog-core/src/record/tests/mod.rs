mod codec_tests;
mod level_tests;

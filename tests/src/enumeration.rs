mod fakes;
mod scenarios;

extern crate hamcrest2;

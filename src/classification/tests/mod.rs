mod verdict_test;

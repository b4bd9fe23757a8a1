mod key_derivation_tests;
